pub mod coordinates;
pub mod transform;

// re-export for cleaner imports
pub use self::coordinates::GenomicCoordinates;
pub use self::transform::ScoreTransform;
