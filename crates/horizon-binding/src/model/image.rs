//! Image payloads read from image properties.

use std::sync::Arc;

use horizon_binding_core::Value;

/// An image a record exposes for display next to an item or node.
///
/// The binding layer does not decode or render images; it only recognizes
/// an `Arc<ImageData>` stored in a [`Value::Object`] and hands it to the
/// control.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageData {
    /// Where the image comes from (a path, URL or resource key).
    pub source: String,
    /// Width in pixels, 0 if unknown.
    pub width: u32,
    /// Height in pixels, 0 if unknown.
    pub height: u32,
}

impl ImageData {
    /// Creates image data of unknown size.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            width: 0,
            height: 0,
        }
    }

    /// Sets the pixel size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Extracts image data from a property value.
    ///
    /// Anything other than an `ImageData` object yields `None`.
    pub fn from_value(value: &Value) -> Option<Arc<ImageData>> {
        value.downcast_arc::<ImageData>()
    }
}

impl From<ImageData> for Value {
    fn from(image: ImageData) -> Self {
        Value::object(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value() {
        let value = Value::from(ImageData::new("icons/folder.png").with_size(16, 16));
        let image = ImageData::from_value(&value).unwrap();
        assert_eq!(image.source, "icons/folder.png");
        assert_eq!((image.width, image.height), (16, 16));

        assert!(ImageData::from_value(&Value::from("icons/folder.png")).is_none());
        assert!(ImageData::from_value(&Value::Null).is_none());
    }
}
