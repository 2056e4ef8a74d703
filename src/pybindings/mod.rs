mod pyfield;
mod pylogger;

use pyo3::prelude::*;

#[pymodule]
pub fn starshell(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<pyfield::PyStarField>()?;
    m.add_function(wrap_pyfunction!(pyfield::angular_to_linear_radius, m)?)?;
    Ok(())
}
