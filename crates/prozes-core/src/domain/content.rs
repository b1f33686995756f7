//! Text vs. binary classification of file content.

use std::path::Path;

/// How many leading bytes are inspected for a NUL byte.
pub const SNIFF_LEN: usize = 8192;

/// Files above this size are reported during capture.
pub const LARGE_FILE_WARN_BYTES: u64 = 10 * 1024 * 1024;

/// Extensions that are always treated as binary, lowercase without the dot.
pub const BINARY_EXTENSIONS: &[&str] = &[
    "pyc", "pyo", "so", "dll", "dylib", "exe", "png", "jpg", "jpeg", "gif", "ico", "pdf", "zip",
    "tar", "gz", "bz2", "xz", "whl", "egg", "class", "jar", "woff", "woff2", "ttf", "otf", "bin",
];

/// Classified file content.
///
/// Text content is valid UTF-8 and eligible for placeholder scanning and
/// substitution. Binary content is carried byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Binary(Vec<u8>),
}

impl Content {
    /// Classify raw bytes read from `path`.
    pub fn classify(path: &Path, bytes: Vec<u8>) -> Self {
        if has_binary_extension(path) || bytes[..bytes.len().min(SNIFF_LEN)].contains(&0) {
            return Self::Binary(bytes);
        }

        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(e) => Self::Binary(e.into_bytes()),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }
}

pub fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_without_nul_is_text() {
        let content = Content::classify(Path::new("app.py"), b"print('hi')\n".to_vec());
        assert_eq!(content, Content::Text("print('hi')\n".into()));
    }

    #[test]
    fn nul_byte_makes_binary() {
        let bytes = b"abc\0{{name}}".to_vec();
        let content = Content::classify(Path::new("data.txt"), bytes.clone());
        assert_eq!(content, Content::Binary(bytes));
    }

    #[test]
    fn nul_beyond_sniff_window_is_still_text() {
        let mut bytes = vec![b'a'; SNIFF_LEN];
        bytes.push(0);
        let content = Content::classify(Path::new("long.txt"), bytes);
        assert!(!content.is_binary());
    }

    #[test]
    fn invalid_utf8_is_binary() {
        let bytes = vec![0xff, 0xfe, b'{', b'{'];
        let content = Content::classify(Path::new("weird.txt"), bytes.clone());
        assert_eq!(content.into_bytes(), bytes);
    }

    #[test]
    fn known_extension_is_binary_even_when_utf8() {
        assert!(Content::classify(Path::new("logo.PNG"), b"{{name}}".to_vec()).is_binary());
        assert!(Content::classify(Path::new("a/b/mod.pyc"), Vec::new()).is_binary());
    }

    #[test]
    fn empty_file_is_text() {
        assert_eq!(
            Content::classify(Path::new("__init__.py"), Vec::new()),
            Content::Text(String::new())
        );
    }
}
