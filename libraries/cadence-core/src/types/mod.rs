mod audio_source;
mod playlist;

pub use audio_source::{
    are_sources_the_same, copy_audio_source, copy_metadata, AudioMetadata, AudioSource,
    MetadataBuilder,
};
pub use playlist::{MoveOp, Playlist, PlaylistId};
