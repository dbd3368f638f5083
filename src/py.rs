use crate::detection::python::PyDetection;
use crate::track::python::PyTrackView;
use crate::trackers::counting::python::PyCountingTracker;
use crate::utils::bbox::python::PyBoundingBox;
use crate::utils::bbox::BoundingBox;
use pyo3::prelude::*;

#[pyfunction]
#[pyo3(name = "iou")]
fn iou_py(l: &PyBoundingBox, r: &PyBoundingBox) -> f32 {
    BoundingBox::iou(&l.0, &r.0)
}

#[pymodule]
#[pyo3(name = "objcount")]
fn objcount(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyBoundingBox>()?;
    m.add_class::<PyDetection>()?;
    m.add_class::<PyTrackView>()?;
    m.add_class::<PyCountingTracker>()?;

    m.add_function(wrap_pyfunction!(iou_py, m)?)?;
    Ok(())
}
