// Capacity, RTT and number formatting rules shared by the table dashlets

/// Throughput is reported against a maximum expressed in megabits; the
/// collector's units put the ratio at `current / (max * 10000)`.
pub const CAPACITY_DIVISOR: f64 = 10000.0;

/// Fraction of capacity in use. `None` when no maximum is configured, so
/// callers never see NaN or infinity.
pub fn capacity_fraction(current: u64, max: u64) -> Option<f64> {
    if max == 0 {
        return None;
    }
    Some(current as f64 / (max as f64 * CAPACITY_DIVISOR))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityBand {
    Green,
    Orange,
    Red,
}

impl CapacityBand {
    /// Each boundary belongs to the higher bucket.
    pub fn classify(fraction: f64) -> Self {
        if fraction < 0.5 {
            CapacityBand::Green
        } else if fraction < 0.75 {
            CapacityBand::Orange
        } else {
            CapacityBand::Red
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            CapacityBand::Green => "green",
            CapacityBand::Orange => "orange",
            CapacityBand::Red => "red",
        }
    }
}

/// Down/up capacity usage of one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacity {
    pub down: f64,
    pub up: f64,
}

impl Capacity {
    pub fn new(current: [u64; 2], max: [u64; 2]) -> Option<Self> {
        Some(Self {
            down: capacity_fraction(current[0], max[0])?,
            up: capacity_fraction(current[1], max[1])?,
        })
    }

    pub fn peak(&self) -> f64 {
        self.down.max(self.up)
    }

    pub fn band(&self) -> CapacityBand {
        CapacityBand::classify(self.peak())
    }
}

/// A configured down/up plan. A plan of `[0, 0]`, or one with the wrong
/// number of sides, means no plan is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub down: u32,
    pub up: u32,
}

impl Plan {
    pub fn from_slice(plan: &[u32]) -> Option<Self> {
        match plan {
            [down, up] if *down != 0 && *up != 0 => Some(Self {
                down: *down,
                up: *up,
            }),
            _ => None,
        }
    }

    pub fn capacity(&self, bits_per_second: [u64; 2]) -> Option<Capacity> {
        Capacity::new(bits_per_second, [self.down as u64, self.up as u64])
    }
}

/// Human-readable magnitude with K/M/G/T suffixes.
pub fn scale_number(n: f64, precision: usize) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "G"), (1e6, "M"), (1e3, "K")];
    for (scale, suffix) in UNITS {
        if n.abs() >= scale {
            return format!("{:.*}{}", precision, n / scale, suffix);
        }
    }
    format!("{:.*}", precision, n)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RttBand {
    Good,
    Fair,
    Poor,
}

impl RttBand {
    pub fn classify(ms: f64) -> Self {
        if ms < 100.0 {
            RttBand::Good
        } else if ms < 150.0 {
            RttBand::Fair
        } else {
            RttBand::Poor
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RttBand::Good => "green",
            RttBand::Fair => "orange",
            RttBand::Poor => "red",
        }
    }
}

/// RTT label and the colour it should be shown in.
pub fn rtt_display(ms: f64) -> (String, &'static str) {
    (format!("{:.0} ms", ms), RttBand::classify(ms).color())
}

pub fn mean(values: &[f32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_capacity_lands_in_upper_bucket() {
        let capacity = Capacity::new([5000, 2000], [1, 1]).unwrap();
        assert_eq!(capacity.down, 0.5);
        assert_eq!(capacity.up, 0.2);
        assert_eq!(capacity.peak(), 0.5);
        assert_eq!(capacity.band(), CapacityBand::Orange);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(CapacityBand::classify(0.4999), CapacityBand::Green);
        assert_eq!(CapacityBand::classify(0.75), CapacityBand::Red);
        assert_eq!(CapacityBand::classify(0.7), CapacityBand::Orange);
    }

    #[test]
    fn test_zero_max_has_no_capacity() {
        assert_eq!(capacity_fraction(100, 0), None);
        assert!(Capacity::new([1, 1], [1, 0]).is_none());
    }

    #[test]
    fn test_plan_detection() {
        assert_eq!(Plan::from_slice(&[0, 0]), None);
        assert_eq!(Plan::from_slice(&[100]), None);
        assert_eq!(Plan::from_slice(&[100, 0]), None);
        assert_eq!(Plan::from_slice(&[1, 2, 3]), None);
        assert_eq!(Plan::from_slice(&[100, 20]), Some(Plan { down: 100, up: 20 }));
    }

    #[test]
    fn test_scale_number() {
        assert_eq!(scale_number(999.0, 0), "999");
        assert_eq!(scale_number(1500.0, 1), "1.5K");
        assert_eq!(scale_number(2_000_000.0, 0), "2M");
        assert_eq!(scale_number(3.2e9, 1), "3.2G");
    }

    #[test]
    fn test_rtt_display() {
        assert_eq!(rtt_display(42.4), ("42 ms".to_string(), "green"));
        assert_eq!(rtt_display(120.0).1, "orange");
        assert_eq!(rtt_display(300.0).1, "red");
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[10.0, 20.0]), Some(15.0));
    }
}
