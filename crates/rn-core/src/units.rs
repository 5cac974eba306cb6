// rn-core/src/units.rs

use uom::si::f64::{Length as UomLength, Ratio as UomRatio};

// Public canonical unit types (SI, f64). Planar CRS units are taken as metres.
pub type Length = UomLength;
pub type Ratio = UomRatio;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

/// Length value in metres.
#[inline]
pub fn in_m(l: Length) -> f64 {
    use uom::si::length::meter;
    l.get::<meter>()
}

/// Plain value of a dimensionless ratio.
#[inline]
pub fn in_ratio(r: Ratio) -> f64 {
    use uom::si::ratio::ratio;
    r.get::<ratio>()
}
