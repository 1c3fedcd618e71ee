//! Filename to syntax-highlight tag lookup for fenced code blocks.

/// Map a file name to a short language tag for Markdown fences.
///
/// Pure lookup: special-cased well-known file names first, then the
/// extension. Returns the empty string when the language is unknown, which
/// renders as a plain fence.
pub fn hint(file_name: &str) -> &'static str {
    match file_name {
        "Makefile" | "makefile" | "GNUmakefile" => return "makefile",
        "Dockerfile" => return "dockerfile",
        "Cargo.lock" => return "toml",
        _ => {}
    }

    let ext = file_name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match ext {
        "rs" => "rust",
        "py" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" | "mts" => "typescript",
        "tsx" => "tsx",
        "jsx" => "jsx",
        "go" => "go",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" => "cpp",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "swift" => "swift",
        "rb" => "ruby",
        "php" => "php",
        "cs" => "csharp",
        "sh" | "bash" | "zsh" => "bash",
        "fish" => "fish",
        "ps1" => "powershell",
        "md" | "markdown" => "markdown",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "xml" => "xml",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" | "sass" => "scss",
        "sql" => "sql",
        "lua" => "lua",
        "vim" => "vim",
        "ex" | "exs" => "elixir",
        "erl" => "erlang",
        "hs" => "haskell",
        "ml" | "mli" => "ocaml",
        "scala" => "scala",
        "clj" | "cljs" => "clojure",
        "zig" => "zig",
        "nix" => "nix",
        "proto" => "protobuf",
        "tf" => "terraform",
        "ini" | "cfg" | "conf" => "ini",
        "txt" => "text",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::hint;

    #[test]
    fn maps_common_extensions() {
        assert_eq!(hint("main.rs"), "rust");
        assert_eq!(hint("script.py"), "python");
        assert_eq!(hint("notes.md"), "markdown");
        assert_eq!(hint("config.yaml"), "yaml");
    }

    #[test]
    fn special_cases_known_file_names() {
        assert_eq!(hint("Makefile"), "makefile");
        assert_eq!(hint("Dockerfile"), "dockerfile");
        assert_eq!(hint("Cargo.lock"), "toml");
    }

    #[test]
    fn uses_the_last_extension() {
        assert_eq!(hint("archive.tar.py"), "python");
    }

    #[test]
    fn unknown_names_yield_empty_tag() {
        assert_eq!(hint("LICENSE"), "");
        assert_eq!(hint("data.bin"), "");
        assert_eq!(hint(""), "");
    }
}
