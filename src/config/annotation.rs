//! Annotation canvas defaults.

pub struct AnnotationSettings {
    /// Stroke width in native image pixels
    pub stroke_width: f32,
    /// Maximum number of undo snapshots kept (each is a full RGBA copy)
    pub max_undo_depth: usize,
}

pub const ANNOTATION: AnnotationSettings = AnnotationSettings {
    stroke_width: 4.0,
    max_undo_depth: 16,
};
