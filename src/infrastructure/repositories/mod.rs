pub mod espeak_repository;
pub mod lame_repository;
pub mod speech_repository;

pub use espeak_repository::EspeakRepository;
pub use lame_repository::LameRepository;
pub use speech_repository::{EncoderRepository, SynthesizerRepository};
