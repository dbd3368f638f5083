use crate::utils::bbox::BoundingBox;

/// Single per-frame observation produced by an external detector
///
/// Detections carry no identity: the detector re-detects every object on every frame and the
/// tracker is responsible for relating them to tracks.
///
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Detection {
    /// class label reported by the detector
    ///
    #[cfg_attr(feature = "serde", serde(rename = "class"))]
    pub class_name: String,
    /// detector confidence in `[0, 1]`
    ///
    pub confidence: f32,
    /// box in pixel coordinates
    ///
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(class_name: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            class_name: class_name.into(),
            confidence,
            bbox,
        }
    }

    /// Checks what the tracker assumes but never validates: a finite, properly oriented box
    /// and a finite confidence. Producers may use it to filter their output.
    ///
    pub fn is_well_formed(&self) -> bool {
        self.bbox.is_well_formed() && self.confidence.is_finite()
    }
}

#[cfg(feature = "python")]
pub mod python {
    use pyo3::prelude::*;

    use super::Detection;
    use crate::utils::bbox::python::PyBoundingBox;

    #[pyclass]
    #[derive(Clone, Debug)]
    #[pyo3(name = "Detection")]
    pub struct PyDetection(pub(crate) Detection);

    #[pymethods]
    impl PyDetection {
        #[classattr]
        const __hash__: Option<Py<PyAny>> = None;

        fn __repr__(&self) -> String {
            format!("{:?}", self.0)
        }

        fn __str__(&self) -> String {
            self.__repr__()
        }

        #[new]
        #[pyo3(signature = (class_name, confidence, bbox))]
        pub fn new(class_name: String, confidence: f32, bbox: (f32, f32, f32, f32)) -> Self {
            Self(Detection::new(class_name, confidence, bbox.into()))
        }

        #[getter]
        pub fn class_name(&self) -> String {
            self.0.class_name.clone()
        }

        #[getter]
        pub fn confidence(&self) -> f32 {
            self.0.confidence
        }

        #[getter]
        pub fn bbox(&self) -> PyBoundingBox {
            PyBoundingBox(self.0.bbox)
        }

        pub fn is_well_formed(&self) -> bool {
            self.0.is_well_formed()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::detection::Detection;
    use crate::utils::bbox::BoundingBox;

    #[test]
    fn well_formed() {
        let d = Detection::new("apple", 0.9, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        assert!(d.is_well_formed());
        assert_eq!(d.class_name, "apple");

        let d = Detection::new("apple", f32::NAN, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        assert!(!d.is_well_formed());

        let d = Detection::new("pear", 0.5, BoundingBox::new(10.0, 0.0, 0.0, 10.0));
        assert!(!d.is_well_formed());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn wire_format() {
        let d: Detection =
            serde_json::from_str(r#"{"class": "apple", "confidence": 0.5, "bbox": [1.0, 2.0, 3.0, 4.0]}"#)
                .unwrap();
        assert_eq!(d, Detection::new("apple", 0.5, BoundingBox::new(1.0, 2.0, 3.0, 4.0)));

        let v = serde_json::to_value(&d).unwrap();
        assert_eq!(v["class"], "apple");
        assert_eq!(v["bbox"], serde_json::json!([1.0, 2.0, 3.0, 4.0]));
    }
}
