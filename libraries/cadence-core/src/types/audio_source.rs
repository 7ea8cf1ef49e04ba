/// Playable item and track metadata value types
use serde::{Deserialize, Deserializer, Serialize};

/// Track metadata attached to every [`AudioSource`]
///
/// Immutable once built. String fields are never absent: missing values
/// become empty strings at construction (builder defaults, or `null` in
/// serialized input).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioMetadata {
    #[serde(default, deserialize_with = "null_as_empty")]
    title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    album: String,

    #[serde(default)]
    album_id: i64,

    #[serde(default, deserialize_with = "null_as_empty")]
    artist: String,

    #[serde(default)]
    artist_id: i64,

    #[serde(default, deserialize_with = "null_as_empty")]
    genre: String,

    /// Duration in milliseconds
    #[serde(default)]
    duration_ms: u32,

    #[serde(default)]
    year: i32,

    #[serde(default)]
    track_number: u32,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl AudioMetadata {
    /// Start building metadata; every field defaults to empty / zero
    pub fn builder() -> MetadataBuilder {
        MetadataBuilder::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn album_id(&self) -> i64 {
        self.album_id
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn artist_id(&self) -> i64 {
        self.artist_id
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn track_number(&self) -> u32 {
        self.track_number
    }
}

/// Builder for [`AudioMetadata`]
///
/// The `*_opt` setters accept values coming from nullable sources (tag
/// readers, foreign records) and normalize `None` to an empty string.
#[derive(Debug, Clone, Default)]
pub struct MetadataBuilder {
    inner: AudioMetadata,
}

impl MetadataBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.inner.title = title.into();
        self
    }

    pub fn title_opt(self, title: Option<String>) -> Self {
        self.title(title.unwrap_or_default())
    }

    pub fn album(mut self, album: impl Into<String>) -> Self {
        self.inner.album = album.into();
        self
    }

    pub fn album_opt(self, album: Option<String>) -> Self {
        self.album(album.unwrap_or_default())
    }

    pub fn album_id(mut self, album_id: i64) -> Self {
        self.inner.album_id = album_id;
        self
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.inner.artist = artist.into();
        self
    }

    pub fn artist_opt(self, artist: Option<String>) -> Self {
        self.artist(artist.unwrap_or_default())
    }

    pub fn artist_id(mut self, artist_id: i64) -> Self {
        self.inner.artist_id = artist_id;
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.inner.genre = genre.into();
        self
    }

    pub fn genre_opt(self, genre: Option<String>) -> Self {
        self.genre(genre.unwrap_or_default())
    }

    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.inner.duration_ms = duration_ms;
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.inner.year = year;
        self
    }

    pub fn track_number(mut self, track_number: u32) -> Self {
        self.inner.track_number = track_number;
        self
    }

    pub fn build(self) -> AudioMetadata {
        self.inner
    }
}

/// A playable item: identity, media locator and metadata
///
/// Equality is structural over all three fields. Use
/// [`AudioSource::is_same_source`] when only the locator matters (queue
/// diffing, removal, `update`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioSource {
    id: i64,
    source: String,
    metadata: AudioMetadata,
}

impl AudioSource {
    /// Create a new audio source
    pub fn new(id: i64, source: impl Into<String>, metadata: AudioMetadata) -> Self {
        Self {
            id,
            source: source.into(),
            metadata,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// URI or file path of the media
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn metadata(&self) -> &AudioMetadata {
        &self.metadata
    }

    /// Same value with different metadata
    #[must_use]
    pub fn with_metadata(&self, metadata: AudioMetadata) -> Self {
        Self {
            id: self.id,
            source: self.source.clone(),
            metadata,
        }
    }

    /// True when both values point at the same media, regardless of id and metadata
    pub fn is_same_source(&self, other: &AudioSource) -> bool {
        self.source == other.source
    }

    // Metadata shortcuts

    pub fn title(&self) -> &str {
        self.metadata.title()
    }

    pub fn artist(&self) -> &str {
        self.metadata.artist()
    }

    pub fn artist_id(&self) -> i64 {
        self.metadata.artist_id()
    }

    pub fn album(&self) -> &str {
        self.metadata.album()
    }

    pub fn album_id(&self) -> i64 {
        self.metadata.album_id()
    }

    pub fn genre(&self) -> &str {
        self.metadata.genre()
    }

    pub fn duration_ms(&self) -> u32 {
        self.metadata.duration_ms()
    }

    pub fn year(&self) -> i32 {
        self.metadata.year()
    }

    pub fn track_number(&self) -> u32 {
        self.metadata.track_number()
    }
}

/// Deep copy of an audio source, independent of the original
pub fn copy_audio_source(item: &AudioSource) -> AudioSource {
    AudioSource::new(item.id, item.source.clone(), copy_metadata(&item.metadata))
}

/// Deep copy of a metadata value
pub fn copy_metadata(metadata: &AudioMetadata) -> AudioMetadata {
    metadata.clone()
}

/// Same-source equality: compares only the media locator
pub fn are_sources_the_same(a: &AudioSource, b: &AudioSource) -> bool {
    a.is_same_source(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_source(id: i64, source: &str, title: &str) -> AudioSource {
        AudioSource::new(
            id,
            source,
            AudioMetadata::builder()
                .title(title)
                .artist("Test Artist")
                .album("Test Album")
                .duration_ms(180_000)
                .build(),
        )
    }

    #[test]
    fn builder_defaults_to_empty_strings() {
        let metadata = AudioMetadata::builder().build();
        assert_eq!(metadata.title(), "");
        assert_eq!(metadata.album(), "");
        assert_eq!(metadata.artist(), "");
        assert_eq!(metadata.genre(), "");
        assert_eq!(metadata.duration_ms(), 0);
    }

    #[test]
    fn optional_setters_normalize_none() {
        let metadata = AudioMetadata::builder()
            .title_opt(None)
            .artist_opt(Some("Band".to_string()))
            .genre_opt(None)
            .build();

        assert_eq!(metadata.title(), "");
        assert_eq!(metadata.artist(), "Band");
        assert_eq!(metadata.genre(), "");
    }

    #[test]
    fn null_strings_deserialize_as_empty() {
        let json = r#"{"title": null, "album": "LP", "artist": null, "duration_ms": 1000}"#;
        let metadata: AudioMetadata = serde_json::from_str(json).unwrap();

        assert_eq!(metadata.title(), "");
        assert_eq!(metadata.album(), "LP");
        assert_eq!(metadata.artist(), "");
        assert_eq!(metadata.genre(), "");
        assert_eq!(metadata.duration_ms(), 1000);
    }

    #[test]
    fn equality_is_structural() {
        let a = create_test_source(1, "/music/a.mp3", "A");
        let b = create_test_source(1, "/music/a.mp3", "A");
        let c = create_test_source(1, "/music/a.mp3", "Renamed");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn same_source_ignores_id_and_metadata() {
        let a = create_test_source(1, "/music/a.mp3", "A");
        let b = create_test_source(99, "/music/a.mp3", "Something else");
        let c = create_test_source(1, "/music/c.mp3", "A");

        assert!(are_sources_the_same(&a, &b));
        assert!(!are_sources_the_same(&a, &c));
    }

    #[test]
    fn copy_round_trip_is_equal() {
        let original = create_test_source(7, "/music/x.flac", "X");
        let copy = copy_audio_source(&copy_audio_source(&original));

        assert_eq!(copy, original);
        assert!(!std::ptr::eq(copy.metadata(), original.metadata()));
    }

    #[test]
    fn with_metadata_keeps_identity() {
        let original = create_test_source(3, "/music/y.mp3", "Y");
        let updated = original.with_metadata(AudioMetadata::builder().title("Y2").build());

        assert_eq!(updated.id(), 3);
        assert!(updated.is_same_source(&original));
        assert_eq!(updated.title(), "Y2");
    }
}
