use std::hash::{Hash, Hasher};

/// One character from the catalog. Identity is the catalog id.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: u64,
    pub name: String,
    pub image_url: String,
    pub description: String,
}

/// Shown on the detail view when the catalog has no description.
pub const FALLBACK_DESCRIPTION: &str = "Cool Marvel Hero.";

impl Record {
    pub fn display_description(&self) -> &str {
        if self.description.trim().is_empty() {
            FALLBACK_DESCRIPTION
        } else {
            &self.description
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Join a thumbnail path and extension, forcing the secure scheme.
pub fn image_url(path: &str, extension: &str) -> String {
    let path = match path.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => path.to_string(),
    };
    format!("{}.{}", path, extension)
}

/// Records returned by a single fetch, with the offset that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub records: Vec<Record>,
}

impl Page {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str) -> Record {
        Record {
            id,
            name: name.to_string(),
            image_url: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn records_compare_by_id() {
        assert_eq!(record(1, "Hulk"), record(1, "Bruce Banner"));
        assert_ne!(record(1, "Hulk"), record(2, "Hulk"));
    }

    #[test]
    fn blank_description_falls_back() {
        let mut hero = record(7, "Wolverine");
        assert_eq!(hero.display_description(), FALLBACK_DESCRIPTION);

        hero.description = "   ".to_string();
        assert_eq!(hero.display_description(), FALLBACK_DESCRIPTION);

        hero.description = "Mutant with claws.".to_string();
        assert_eq!(hero.display_description(), "Mutant with claws.");
    }

    #[test]
    fn image_url_upgrades_plain_http() {
        assert_eq!(
            image_url("http://i.annihil.us/u/prod/marvel/i/mg/c/e0/535fecbbb9784", "jpg"),
            "https://i.annihil.us/u/prod/marvel/i/mg/c/e0/535fecbbb9784.jpg"
        );
    }

    #[test]
    fn image_url_keeps_https() {
        assert_eq!(
            image_url("https://cdn.example.com/a", "png"),
            "https://cdn.example.com/a.png"
        );
    }
}
