//! Texture catalog
//!
//! Per-category ordered lists of `{key, url}` entries discovered from the
//! texture service. Each category falls back to one bundled entry when the
//! service yields nothing, so index-based commands always have at least one
//! texture to land on. Categories are replaced atomically, never edited in
//! place.

use shared::TextureHit;

/// One of the four texture categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureCategory {
    Grass,
    Mud,
    Rock,
    Heightmap,
}

impl TextureCategory {
    pub const ALL: [TextureCategory; 4] = [
        TextureCategory::Grass,
        TextureCategory::Mud,
        TextureCategory::Rock,
        TextureCategory::Heightmap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TextureCategory::Grass => "grass",
            TextureCategory::Mud => "mud",
            TextureCategory::Rock => "rock",
            TextureCategory::Heightmap => "heightmap",
        }
    }

    pub fn parse_token(token: &str) -> Option<TextureCategory> {
        match token {
            "grass" => Some(TextureCategory::Grass),
            "mud" => Some(TextureCategory::Mud),
            "rock" => Some(TextureCategory::Rock),
            "heightmap" => Some(TextureCategory::Heightmap),
            _ => None,
        }
    }

    /// Bundled default used when the service yields nothing
    fn fallback(self) -> TextureEntry {
        let (key, url) = match self {
            TextureCategory::Grass => ("fallback_grass", "assets/textures/grass.jpg"),
            TextureCategory::Mud => ("fallback_mud", "assets/textures/mud.png"),
            TextureCategory::Rock => ("fallback_rock", "assets/textures/rock.jpg"),
            TextureCategory::Heightmap => ("heightmap1", "assets/textures/heightmap.png"),
        };
        TextureEntry {
            key: key.to_string(),
            url: url.to_string(),
        }
    }
}

impl std::fmt::Display for TextureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureEntry {
    pub key: String,
    pub url: String,
}

/// Live texture catalog, one ordered entry list per category
pub struct TextureCatalog {
    grass: Vec<TextureEntry>,
    mud: Vec<TextureEntry>,
    rock: Vec<TextureEntry>,
    heightmap: Vec<TextureEntry>,
}

impl Default for TextureCatalog {
    fn default() -> Self {
        Self {
            grass: vec![TextureCategory::Grass.fallback()],
            mud: vec![TextureCategory::Mud.fallback()],
            rock: vec![TextureCategory::Rock.fallback()],
            heightmap: vec![TextureCategory::Heightmap.fallback()],
        }
    }
}

impl TextureCatalog {
    fn entries(&self, category: TextureCategory) -> &[TextureEntry] {
        match category {
            TextureCategory::Grass => &self.grass,
            TextureCategory::Mud => &self.mud,
            TextureCategory::Rock => &self.rock,
            TextureCategory::Heightmap => &self.heightmap,
        }
    }

    /// Atomically replace one category with the service's reply. An empty
    /// reply keeps the bundled fallback instead.
    pub fn replace(&mut self, category: TextureCategory, hits: &[TextureHit]) {
        let entries = if hits.is_empty() {
            tracing::warn!(%category, "no textures from service, keeping fallback");
            vec![category.fallback()]
        } else {
            hits.iter()
                .enumerate()
                .map(|(i, hit)| TextureEntry {
                    key: sanitize_key(category, &hit.name, i),
                    url: hit.url.clone(),
                })
                .collect()
        };
        tracing::info!(%category, count = entries.len(), "texture catalog updated");
        match category {
            TextureCategory::Grass => self.grass = entries,
            TextureCategory::Mud => self.mud = entries,
            TextureCategory::Rock => self.rock = entries,
            TextureCategory::Heightmap => self.heightmap = entries,
        }
    }

    /// Number of textures currently known for a category
    pub fn count(&self, category: TextureCategory) -> usize {
        self.entries(category).len()
    }

    /// Key at a 1-based index
    pub fn key_at(&self, category: TextureCategory, index: usize) -> Option<&str> {
        if index == 0 {
            return None;
        }
        self.entries(category)
            .get(index - 1)
            .map(|e| e.key.as_str())
    }

    /// 1-based index of a key; unknown keys resolve to 1
    pub fn index_of(&self, category: TextureCategory, key: &str) -> usize {
        self.entries(category)
            .iter()
            .position(|e| e.key == key)
            .map(|i| i + 1)
            .unwrap_or(1)
    }

    /// URL for an exact key, if present
    pub fn url_for(&self, category: TextureCategory, key: &str) -> Option<&str> {
        self.entries(category)
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.url.as_str())
    }

    /// Resolve an optional key: exact match, else the category's first
    /// entry. The catalog always holds at least the bundled fallback, so
    /// this never fails.
    pub fn resolve_url(&self, category: TextureCategory, key: Option<&str>) -> &str {
        if let Some(url) = key.and_then(|k| self.url_for(category, k)) {
            return url;
        }
        &self.entries(category)[0].url
    }

    /// Heightmap URL by 1-based asset index, falling back to the first
    /// heightmap entry
    pub fn heightmap_url(&self, index: u8) -> &str {
        let entries = self.entries(TextureCategory::Heightmap);
        entries
            .get(index.saturating_sub(1) as usize)
            .unwrap_or(&entries[0])
            .url
            .as_str()
    }
}

/// Build a catalog key from a service texture name: lowercase, whitespace
/// to underscores, strip other punctuation, drop a `_texture` suffix and a
/// leading `<category>_`. Empty results become `<category><ordinal>`.
fn sanitize_key(category: TextureCategory, name: &str, ordinal: usize) -> String {
    let mut key: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if let Some(stripped) = key.strip_suffix("_texture") {
        key = stripped.to_string();
    }
    let prefix = format!("{}_", category.as_str());
    if let Some(stripped) = key.strip_prefix(&prefix) {
        key = stripped.to_string();
    }
    if key.is_empty() {
        key = format!("{}{}", category.as_str(), ordinal + 1);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(names: &[&str]) -> Vec<TextureHit> {
        names
            .iter()
            .map(|n| TextureHit {
                name: n.to_string(),
                url: format!("https://textures.test/{}", n.replace(' ', "-")),
            })
            .collect()
    }

    #[test]
    fn test_default_has_one_fallback_per_category() {
        let c = TextureCatalog::default();
        for category in TextureCategory::ALL {
            assert_eq!(c.count(category), 1);
        }
        assert_eq!(c.key_at(TextureCategory::Grass, 1), Some("fallback_grass"));
    }

    #[test]
    fn test_replace_and_index_helpers() {
        let mut c = TextureCatalog::default();
        c.replace(
            TextureCategory::Grass,
            &hits(&["Grass Meadow", "Dry Lawn", "Moss"]),
        );
        assert_eq!(c.count(TextureCategory::Grass), 3);
        assert_eq!(c.key_at(TextureCategory::Grass, 1), Some("meadow"));
        assert_eq!(c.key_at(TextureCategory::Grass, 3), Some("moss"));
        assert_eq!(c.key_at(TextureCategory::Grass, 4), None);
        assert_eq!(c.key_at(TextureCategory::Grass, 0), None);
        assert_eq!(c.index_of(TextureCategory::Grass, "dry_lawn"), 2);
        assert_eq!(c.index_of(TextureCategory::Grass, "unknown"), 1);
    }

    #[test]
    fn test_replace_with_empty_keeps_fallback() {
        let mut c = TextureCatalog::default();
        c.replace(TextureCategory::Mud, &hits(&["Wet Mud"]));
        assert_eq!(c.key_at(TextureCategory::Mud, 1), Some("wet_mud"));
        c.replace(TextureCategory::Mud, &[]);
        assert_eq!(c.count(TextureCategory::Mud), 1);
        assert_eq!(c.key_at(TextureCategory::Mud, 1), Some("fallback_mud"));
    }

    #[test]
    fn test_sanitize_key_rules() {
        assert_eq!(
            sanitize_key(TextureCategory::Grass, "Grass Meadow Texture", 0),
            "meadow"
        );
        assert_eq!(
            sanitize_key(TextureCategory::Rock, "Granite (dark)", 0),
            "granite_dark"
        );
        assert_eq!(sanitize_key(TextureCategory::Mud, "!!!", 2), "mud3");
    }

    #[test]
    fn test_resolve_url_chain() {
        let mut c = TextureCatalog::default();
        c.replace(TextureCategory::Rock, &hits(&["Granite", "Basalt"]));
        // exact key
        assert_eq!(
            c.resolve_url(TextureCategory::Rock, Some("basalt")),
            "https://textures.test/Basalt"
        );
        // unknown key falls back to first entry
        assert_eq!(
            c.resolve_url(TextureCategory::Rock, Some("marble")),
            "https://textures.test/Granite"
        );
        // unset key falls back to first entry
        assert_eq!(
            c.resolve_url(TextureCategory::Rock, None),
            "https://textures.test/Granite"
        );
    }

    #[test]
    fn test_heightmap_url_by_index() {
        let mut c = TextureCatalog::default();
        c.replace(
            TextureCategory::Heightmap,
            &hits(&["Heightmap A", "Heightmap B"]),
        );
        assert_eq!(c.heightmap_url(2), "https://textures.test/Heightmap-B");
        // out-of-range index falls back to the first entry
        assert_eq!(c.heightmap_url(5), "https://textures.test/Heightmap-A");
    }
}
