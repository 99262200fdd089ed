//! Sensor reading reported by a probe.

/// One sensor sample as decoded from an inbound frame.
///
/// Every field is optional: a probe may report only the sensors it has.
/// The timestamp is not part of the sample; the store stamps each row with
/// the server-observed time when it is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    /// Total dissolved solids, in ppm.
    pub tds: Option<f64>,
    /// Turbidity, in NTU.
    pub turbidity: Option<f64>,
    /// pH.
    pub ph: Option<f64>,
}

impl Reading {
    /// Creates a reading from the three optional values.
    #[must_use]
    pub const fn new(tds: Option<f64>, turbidity: Option<f64>, ph: Option<f64>) -> Self {
        Self { tds, turbidity, ph }
    }

    /// Returns `true` if the probe reported none of the three values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tds.is_none() && self.turbidity.is_none() && self.ph.is_none()
    }
}
