//! Training input

use analytics_core::{Error, Numeric, NumericTable, Result};

/// Independent and dependent variables of one training call
///
/// Both tables are borrowed; they must have the same number of rows.
#[derive(Clone, Copy)]
pub struct TrainingInput<'a, T: Numeric> {
    pub data: &'a dyn NumericTable<T>,
    pub responses: &'a dyn NumericTable<T>,
}

impl<'a, T: Numeric> TrainingInput<'a, T> {
    pub fn new(data: &'a dyn NumericTable<T>, responses: &'a dyn NumericTable<T>) -> Self {
        Self { data, responses }
    }

    pub fn n_rows(&self) -> usize {
        self.data.n_rows()
    }

    pub fn n_features(&self) -> usize {
        self.data.n_columns()
    }

    pub fn n_responses(&self) -> usize {
        self.responses.n_columns()
    }

    /// Check shapes before any kernel work
    pub fn validate(&self) -> Result<()> {
        if self.data.n_rows() == 0 {
            return Err(Error::empty_input("independent variables table"));
        }
        if self.data.n_columns() == 0 {
            return Err(Error::InvalidParameter(
                "independent variables table has no columns".into(),
            ));
        }
        if self.responses.n_columns() == 0 {
            return Err(Error::InvalidParameter(
                "dependent variables table has no columns".into(),
            ));
        }
        if self.responses.n_rows() != self.data.n_rows() {
            return Err(Error::size_mismatch(
                self.data.n_rows(),
                self.responses.n_rows(),
                "dependent variables rows",
            ));
        }
        Ok(())
    }
}
