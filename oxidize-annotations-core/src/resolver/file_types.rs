use crate::annotations::MediaType;
use std::collections::HashMap;

lazy_static::lazy_static! {
    static ref DEFAULT_FILE_TYPES: HashMap<String, MediaType> = {
        let mut table = HashMap::new();

        for ext in ["mpg", "mpeg", "mp4", "m4v", "mov", "avi", "3gp"] {
            table.insert(ext.to_string(), MediaType::Video);
        }
        for ext in ["mp3", "m4a", "aac", "wav", "aiff", "caf"] {
            table.insert(ext.to_string(), MediaType::Audio);
        }
        for ext in ["jpg", "jpeg", "png", "gif", "tiff", "bmp"] {
            table.insert(ext.to_string(), MediaType::Image);
        }

        table
    };
}

/// Extension to media classification, consulted when resolving
/// custom-protocol links. Keys are stored lower-case; lookups ignore case.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTypeTable {
    entries: HashMap<String, MediaType>,
}

impl FileTypeTable {
    /// An empty table: every extension resolves to a generic link
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Map an extension (with or without a leading dot) to a media type
    pub fn insert(&mut self, extension: &str, media: MediaType) -> Option<MediaType> {
        self.entries.insert(normalize(extension), media)
    }

    pub fn with(mut self, extension: &str, media: MediaType) -> Self {
        self.insert(extension, media);
        self
    }

    pub fn remove(&mut self, extension: &str) -> Option<MediaType> {
        self.entries.remove(&normalize(extension))
    }

    pub fn get(&self, extension: &str) -> Option<MediaType> {
        self.entries.get(&normalize(extension)).copied()
    }

    /// Classification for an extension. Unknown extensions are generic links,
    /// never an error.
    pub fn classify(&self, extension: Option<&str>) -> MediaType {
        extension
            .and_then(|ext| self.get(ext))
            .unwrap_or(MediaType::Link)
    }

    /// Sorted extensions mapped to `media`
    pub fn extensions_for(&self, media: MediaType) -> Vec<String> {
        let mut extensions: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, m)| **m == media)
            .map(|(ext, _)| ext.clone())
            .collect();
        extensions.sort();
        extensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FileTypeTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_FILE_TYPES.clone(),
        }
    }
}

impl FromIterator<(String, MediaType)> for FileTypeTable {
    fn from_iter<T: IntoIterator<Item = (String, MediaType)>>(iter: T) -> Self {
        let mut table = FileTypeTable::empty();
        for (ext, media) in iter {
            table.insert(&ext, media);
        }
        table
    }
}

fn normalize(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = FileTypeTable::default();
        assert_eq!(table.get("mpg"), Some(MediaType::Video));
        assert_eq!(table.get("mp3"), Some(MediaType::Audio));
        assert_eq!(table.get("png"), Some(MediaType::Image));
        assert_eq!(table.get("pdf"), None);
    }

    #[test]
    fn test_lookup_ignores_case_and_dot() {
        let table = FileTypeTable::empty().with("MP4", MediaType::Video);
        assert_eq!(table.get("mp4"), Some(MediaType::Video));
        assert_eq!(table.get(".Mp4"), Some(MediaType::Video));
    }

    #[test]
    fn test_classify_defaults_to_link() {
        let table = FileTypeTable::default();
        assert_eq!(table.classify(Some("xyz")), MediaType::Link);
        assert_eq!(table.classify(None), MediaType::Link);
        assert_eq!(table.classify(Some("MOV")), MediaType::Video);
    }

    #[test]
    fn test_extensions_for_is_sorted() {
        let table = FileTypeTable::empty()
            .with("mpg", MediaType::Video)
            .with("avi", MediaType::Video)
            .with("mp3", MediaType::Audio);
        assert_eq!(table.extensions_for(MediaType::Video), vec!["avi", "mpg"]);
        assert_eq!(table.extensions_for(MediaType::Image), Vec::<String>::new());
    }

    #[test]
    fn test_insert_and_remove() {
        let mut table = FileTypeTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.insert("ogg", MediaType::Audio), None);
        assert_eq!(table.insert("OGG", MediaType::Video), Some(MediaType::Audio));
        assert_eq!(table.len(), 1);
        assert_eq!(table.remove("ogg"), Some(MediaType::Video));
        assert!(table.is_empty());
    }
}
