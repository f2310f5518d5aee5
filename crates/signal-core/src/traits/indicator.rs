//! Series transforms used by the scorers.

/// A series transform producing one value per input point once `period`
/// points are available.
///
/// Outputs line up with the tail of the input: the last output describes
/// the last input. Input shorter than `period` gives an empty vector, never
/// an error, so scorers can fall back to neutral values.
pub trait Indicator: Send + Sync {
    type Output;

    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Points needed before the first output.
    fn period(&self) -> usize;

    /// Value for the last input point, `None` while warming up.
    fn latest(&self, data: &[f64]) -> Option<Self::Output> {
        self.calculate(data).pop()
    }
}

/// Like [`Indicator`], but each output bundles several lines (MACD line,
/// signal and histogram).
pub trait MultiOutputIndicator: Send + Sync {
    type Outputs;

    fn calculate(&self, data: &[f64]) -> Vec<Self::Outputs>;

    fn period(&self) -> usize;

    fn latest(&self, data: &[f64]) -> Option<Self::Outputs> {
        self.calculate(data).pop()
    }
}
