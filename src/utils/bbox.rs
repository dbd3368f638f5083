use crate::{EstimateClose, EPS};

/// Bounding box in the format (x1, y1, x2, y2), pixel coordinates
///
/// The box is expected to satisfy `x1 < x2` and `y1 < y2`; this is not enforced,
/// see [`BoundingBox::is_well_formed`].
///
#[derive(Clone, Default, Debug, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "[f32; 4]", into = "[f32; 4]")
)]
pub struct BoundingBox {
    _x1: f32,
    _y1: f32,
    _x2: f32,
    _y2: f32,
}

impl BoundingBox {
    /// Constructor
    ///
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            _x1: x1,
            _y1: y1,
            _x2: x2,
            _y2: y2,
        }
    }

    /// Creates the box from the left-top corner and dimensions
    ///
    pub fn xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn x1(&self) -> f32 {
        self._x1
    }

    pub fn y1(&self) -> f32 {
        self._y1
    }

    pub fn x2(&self) -> f32 {
        self._x2
    }

    pub fn y2(&self) -> f32 {
        self._y2
    }

    pub fn width(&self) -> f32 {
        self._x2 - self._x1
    }

    pub fn height(&self) -> f32 {
        self._y2 - self._y1
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self._x1, self._y1, self._x2, self._y2]
    }

    /// Finite coordinates with positive width and height
    ///
    pub fn is_well_formed(&self) -> bool {
        self.as_array().iter().all(|c| c.is_finite()) && self._x1 < self._x2 && self._y1 < self._y2
    }

    /// Area of the intersection rectangle, `0.0` when the boxes don't overlap
    ///
    pub fn intersection(l: &BoundingBox, r: &BoundingBox) -> f32 {
        let (x1, y1) = (l._x1.max(r._x1), l._y1.max(r._y1));
        let (x2, y2) = (l._x2.min(r._x2), l._y2.min(r._y2));

        let int_width = x2 - x1;
        let int_height = y2 - y1;

        if int_width > 0.0 && int_height > 0.0 {
            int_width * int_height
        } else {
            0.0
        }
    }

    /// Intersection over union of two boxes
    ///
    /// Returns `0.0` for disjoint boxes and for degenerate pairs whose union area is not positive,
    /// so the result always lies in `[0, 1]` for well-formed input.
    ///
    pub fn iou(l: &BoundingBox, r: &BoundingBox) -> f32 {
        let intersection = BoundingBox::intersection(l, r);
        if intersection <= 0.0 {
            return 0.0;
        }

        let union = l.area() + r.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }

    /// Exponential smoothing towards `observed`
    ///
    /// # Parameters
    /// * `observed` - the newly observed box
    /// * `alpha` - weight of the observed box, `1.0 - alpha` is kept from `self`
    ///
    pub fn smooth(&self, observed: &BoundingBox, alpha: f32) -> BoundingBox {
        let keep = 1.0 - alpha;
        BoundingBox::new(
            keep * self._x1 + alpha * observed._x1,
            keep * self._y1 + alpha * observed._y1,
            keep * self._x2 + alpha * observed._x2,
            keep * self._y2 + alpha * observed._y2,
        )
    }
}

impl EstimateClose for BoundingBox {
    /// Allows comparing bboxes
    ///
    fn almost_same(&self, other: &Self, eps: f32) -> bool {
        (self._x1 - other._x1).abs() < eps
            && (self._y1 - other._y1).abs() < eps
            && (self._x2 - other._x2).abs() < eps
            && (self._y2 - other._y2).abs() < eps
    }
}

impl PartialEq<Self> for BoundingBox {
    fn eq(&self, other: &Self) -> bool {
        self.almost_same(other, EPS)
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(c: [f32; 4]) -> Self {
        BoundingBox::new(c[0], c[1], c[2], c[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        b.as_array()
    }
}

impl From<(f32, f32, f32, f32)> for BoundingBox {
    fn from((x1, y1, x2, y2): (f32, f32, f32, f32)) -> Self {
        BoundingBox::new(x1, y1, x2, y2)
    }
}

#[cfg(feature = "python")]
pub mod python {
    use pyo3::prelude::*;

    use super::BoundingBox;

    #[pyclass]
    #[derive(Clone, Copy, Debug)]
    #[pyo3(name = "BoundingBox")]
    pub struct PyBoundingBox(pub(crate) BoundingBox);

    #[pymethods]
    impl PyBoundingBox {
        #[classattr]
        const __hash__: Option<Py<PyAny>> = None;

        fn __repr__(&self) -> String {
            format!("{:?}", self.0)
        }

        fn __str__(&self) -> String {
            self.__repr__()
        }

        #[new]
        pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
            Self(BoundingBox::new(x1, y1, x2, y2))
        }

        #[staticmethod]
        pub fn xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
            Self(BoundingBox::xywh(x, y, width, height))
        }

        #[getter]
        pub fn x1(&self) -> f32 {
            self.0.x1()
        }

        #[getter]
        pub fn y1(&self) -> f32 {
            self.0.y1()
        }

        #[getter]
        pub fn x2(&self) -> f32 {
            self.0.x2()
        }

        #[getter]
        pub fn y2(&self) -> f32 {
            self.0.y2()
        }

        pub fn area(&self) -> f32 {
            self.0.area()
        }

        pub fn as_ltrb(&self) -> (f32, f32, f32, f32) {
            let [x1, y1, x2, y2] = self.0.as_array();
            (x1, y1, x2, y2)
        }

        pub fn iou(&self, other: &PyBoundingBox) -> f32 {
            BoundingBox::iou(&self.0, &other.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::bbox::BoundingBox;
    use crate::{EstimateClose, EPS};

    #[test]
    fn test_iou() {
        let bb1 = BoundingBox::new(-1.0, -1.0, 1.0, 1.0);
        let bb2 = BoundingBox::xywh(-0.9, -0.9, 2.0, 2.0);
        let bb3 = BoundingBox::xywh(1.0, 1.0, 3.0, 3.0);

        assert!((BoundingBox::iou(&bb1, &bb1) - 1.0).abs() < EPS);
        assert!((BoundingBox::iou(&bb2, &bb2) - 1.0).abs() < EPS);
        assert!(BoundingBox::iou(&bb1, &bb2) > 0.8);
        assert_eq!(BoundingBox::iou(&bb1, &bb3), 0.0);
        assert_eq!(BoundingBox::iou(&bb2, &bb3), 0.0);
    }

    #[test]
    fn iou_known_value() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(1.0, 1.0, 11.0, 11.0);
        // 81 / (100 + 100 - 81)
        let expected = 81.0 / 119.0;
        assert!((BoundingBox::iou(&a, &b) - expected).abs() < EPS);
        assert!((BoundingBox::iou(&b, &a) - expected).abs() < EPS);
    }

    #[test]
    fn iou_is_symmetric_and_bounded() {
        let boxes = [
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            BoundingBox::new(5.0, 5.0, 15.0, 12.0),
            BoundingBox::new(-3.0, 2.0, 4.0, 30.0),
            BoundingBox::new(100.0, 100.0, 101.0, 101.0),
            BoundingBox::new(2.0, 2.0, 3.0, 3.0),
        ];

        for a in &boxes {
            for b in &boxes {
                let ab = BoundingBox::iou(a, b);
                let ba = BoundingBox::iou(b, a);
                assert!((0.0..=1.0).contains(&ab));
                assert!((ab - ba).abs() < EPS);
            }
        }
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
        assert_eq!(BoundingBox::intersection(&a, &b), 0.0);
        assert_eq!(BoundingBox::iou(&a, &b), 0.0);
    }

    #[test]
    fn degenerate_boxes() {
        let point = BoundingBox::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(BoundingBox::iou(&point, &point), 0.0);

        let inverted = BoundingBox::new(10.0, 10.0, 0.0, 0.0);
        assert!(!inverted.is_well_formed());
        assert_eq!(BoundingBox::iou(&inverted, &inverted), 0.0);

        assert!(!BoundingBox::new(0.0, 0.0, f32::NAN, 1.0).is_well_formed());
        assert!(BoundingBox::new(0.0, 0.0, 1.0, 1.0).is_well_formed());
    }

    #[test]
    fn smoothing() {
        let old = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let observed = BoundingBox::new(1.0, 1.0, 11.0, 11.0);
        let smoothed = old.smooth(&observed, 0.3);
        assert!(smoothed.almost_same(&BoundingBox::new(0.3, 0.3, 10.3, 10.3), EPS));
        assert!(old.smooth(&observed, 1.0).almost_same(&observed, EPS));
        assert!(old.smooth(&observed, 0.0).almost_same(&old, EPS));
    }

    #[test]
    fn conversions() {
        let b = BoundingBox::xywh(1.0, 2.0, 3.0, 4.0);
        assert_eq!(b.as_array(), [1.0, 2.0, 4.0, 6.0]);
        assert_eq!(BoundingBox::from([1.0, 2.0, 4.0, 6.0]), b);
        assert_eq!(BoundingBox::from((1.0, 2.0, 4.0, 6.0)), b);
        let arr: [f32; 4] = b.into();
        assert_eq!(arr, [1.0, 2.0, 4.0, 6.0]);
        assert!((b.width() - 3.0).abs() < EPS);
        assert!((b.height() - 4.0).abs() < EPS);
        assert!((b.area() - 12.0).abs() < EPS);
    }
}
