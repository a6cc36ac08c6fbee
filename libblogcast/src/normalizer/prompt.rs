//! Instructions sent ahead of the raw text

/// Separates the instructions from the user's raw text
pub const INPUT_SEPARATOR: &str = "\n\n[Input]\n";

/// Section headings the body must contain, in order
pub const SECTIONS: [(&str, &str); 9] = [
    ("Overview", "what the post covers, who it is for, and the assumed background in one or two lines"),
    ("Quick summary", "a list of 3-6 key points; mark commands, files and options as code"),
    ("Prerequisites", "OS and versions, dependencies, recommended specs and required permissions"),
    ("Installation and setup", "step-by-step instructions; every step states its purpose, command, result and how to verify it"),
    ("Example code", "a minimal reproducible example together with how to run it and its expected output"),
    ("Common errors and fixes", "error messages with cause and numbered fix, plus performance/cost tips and security notes on keys and tokens"),
    ("Migration and alternatives", "version differences, alternative libraries and compatibility notes"),
    ("Wrap-up", "benefits of applying the guide and next steps such as testing, deployment and monitoring"),
    ("FAQ", "3-5 short questions with answers"),
];

/// Build the editor instructions, asking for output written in `language`
pub fn instructions(language: &str) -> String {
    let mut out = format!(
        "You are the editor of a developer blog written in {language}. Turn the input into an \
         accurate, reproducible tutorial that readers can follow step by step. Keep a polite, \
         professional tone.\n\n\
         [Output format: respond with a single JSON object and nothing else]\n\
         - title: at most 80 characters, containing the key terms (framework, library or error name).\n\
         - excerpt: at most 160 characters; one paragraph saying what the reader will get (used as the meta description).\n\
         - content_html: HTML only, containing these sections in this order, each introduced by an <h2>:\n"
    );

    for (i, (heading, detail)) in SECTIONS.iter().enumerate() {
        out.push_str(&format!("  {}) <h2>{}</h2>: {}\n", i + 1, heading, detail));
    }

    out.push_str(
        "- tags: array of strings.\n\
         - categories: array of strings.\n\
         - slug: string.\n\n\
         [Content rules]\n\
         - Use only h2/h3/p/ul/li/blockquote/pre/code/table/a. No img, never insert script or style.\n\
         - Wrap every code sample in <pre><code class=\"language-NAME\">...</code></pre> and always name the \
         language (language-javascript, language-python, language-bash, language-plaintext).\n\
         - Highlight command, file, option and key names with inline <code>...</code>.\n\
         - State real versions, paths and option values where possible (for example Python 3.11, macOS 14).\n\
         - Give each subsection two to four paragraphs or more, with numbers, commands or sample output.\n\
         - Use only absolute http/https links and keep them few.\n\n\
         [Classification rules]\n\
         - tags: 4-7 entries, lowercase with hyphens (for example python, fastapi, github-actions, performance).\n\
         - categories: 1-2 entries, defaulting to [\"Development\", \"Tutorial\"]; replace them when the topic is clear.\n\
         - slug: lowercase words joined by hyphens.\n\n\
         [Quality bar]\n\
         - Verify facts: every command and option you mention must exist.\n\
         - Keep it reproducible: install, run and verify must flow without gaps.\n\
         - No filler or repetition. Prefer tables and lists.\n",
    );

    out
}
