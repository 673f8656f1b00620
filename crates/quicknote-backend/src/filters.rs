//! File dialog filters

const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "json", "js", "ts", "vue", "rs", "py", "java", "cpp", "c", "h", "hpp", "cs",
    "php", "rb", "go", "swift", "kt", "scala", "r", "m", "pl", "sh", "bat", "ps1", "sql", "xml",
    "html", "css", "scss", "sass", "less", "yaml", "yml", "toml", "ini", "cfg", "conf", "log",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

const TEXT_FILES: FileFilter = FileFilter {
    name: "Text Files",
    extensions: TEXT_EXTENSIONS,
};

const ALL_FILES: FileFilter = FileFilter {
    name: "All Files",
    extensions: &["*"],
};

pub fn open_filters() -> Vec<FileFilter> {
    vec![TEXT_FILES, ALL_FILES]
}

/// Save dialog filters, led by the one matching `default_format`
pub fn save_filters(default_format: &str) -> Vec<FileFilter> {
    let primary = match default_format {
        "md" => FileFilter {
            name: "Markdown Files",
            extensions: &["md", "markdown"],
        },
        "js" => FileFilter {
            name: "JavaScript Files",
            extensions: &["js"],
        },
        "ts" => FileFilter {
            name: "TypeScript Files",
            extensions: &["ts"],
        },
        "json" => FileFilter {
            name: "JSON Files",
            extensions: &["json"],
        },
        "html" => FileFilter {
            name: "HTML Files",
            extensions: &["html", "htm"],
        },
        "css" => FileFilter {
            name: "CSS Files",
            extensions: &["css"],
        },
        _ => FileFilter {
            name: "Text Files",
            extensions: &["txt"],
        },
    };

    vec![primary, TEXT_FILES, ALL_FILES]
}
