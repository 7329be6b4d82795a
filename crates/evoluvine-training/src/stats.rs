use serde::Serialize;

/// Summary of one generation's fitness distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitnessStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    /// Middle value; the mean of the two middle values for even counts.
    pub median: f32,
    /// Population standard deviation.
    pub std_dev: f32,
}

impl FitnessStats {
    /// Computes the statistics of `values`, or `None` if there are none.
    ///
    /// ```
    /// use evoluvine_training::stats::FitnessStats;
    ///
    /// let stats = FitnessStats::new([4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);

        let min = *values.first()?;
        let max = *values.last()?;
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
        let mid = values.len() / 2;
        let median = if values.len() % 2 == 0 {
            f32::midpoint(values[mid - 1], values[mid])
        } else {
            values[mid]
        };
        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}
