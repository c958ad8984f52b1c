/// Icon category picked from a file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Document,
    Presentation,
    Image,
    Other,
}

impl FileKind {
    pub fn from_name(name: &str) -> Self {
        let ext = match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => return FileKind::Other,
        };

        match ext.as_str() {
            "pdf" => FileKind::Pdf,
            "doc" | "docx" => FileKind::Document,
            "ppt" | "pptx" => FileKind::Presentation,
            "jpeg" | "jpg" | "png" | "gif" => FileKind::Image,
            _ => FileKind::Other,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FileKind::Pdf => "📕",
            FileKind::Document => "📝",
            FileKind::Presentation => "📊",
            FileKind::Image => "🖼",
            FileKind::Other => "📄",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_extensions() {
        assert_eq!(FileKind::from_name("Report.PDF"), FileKind::Pdf);
        assert_eq!(FileKind::from_name("a.docx"), FileKind::Document);
        assert_eq!(FileKind::from_name("deck.ppt"), FileKind::Presentation);
        assert_eq!(FileKind::from_name("cat.jpeg"), FileKind::Image);
        assert_eq!(FileKind::from_name("archive.tar.gz"), FileKind::Other);
        assert_eq!(FileKind::from_name("Makefile"), FileKind::Other);
    }
}
