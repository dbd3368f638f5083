/// Bounding boxes and the IoU overlap metric
pub mod bbox;
