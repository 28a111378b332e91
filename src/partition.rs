//! The partition catalog and frame calculator.
//!
//! A [`Partition`] is a named fractional rectangle of a parent frame
//! (usually a screen's visible frame).  [`Partition::resolve`] turns one
//! into concrete, whole-unit geometry:
//!
//! ```text
//!   left = round(parent.x + fl * parent.width)
//!   top  = round(parent.y + ft * parent.height)
//!   ...and likewise for right / bottom; width = right - left
//! ```
//!
//! Because neighbouring partitions share the very same edge fraction, they
//! land on the very same rounded edge: halves, quarters, thirds and sixths
//! tile their parent with no gap and no overlap.

use crate::geometry::{normalize, Frame};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const HALF: f64 = 1.0 / 2.0;
const QUARTER: f64 = 1.0 / 4.0;
const THREE_QUARTERS: f64 = 3.0 / 4.0;
const THIRD: f64 = 1.0 / 3.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;

/// Every layout rule tilebind knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Partition {
    Left,
    Right,
    Up,
    Down,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Centre,
    LeftThird,
    CentreThird,
    RightThird,
    Left2Thirds,
    Right2Thirds,
    TopLeftSix,
    TopCentreSix,
    TopRightSix,
    BotLeftSix,
    BotCentreSix,
    BotRightSix,
}

/// Error returned when a textual partition name is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown partition: {0:?}")]
pub struct PartitionError(pub String);

impl Partition {
    /// The whole catalog, in declaration order.
    pub const ALL: [Partition; 20] = [
        Partition::Left,
        Partition::Right,
        Partition::Up,
        Partition::Down,
        Partition::TopLeft,
        Partition::TopRight,
        Partition::BottomLeft,
        Partition::BottomRight,
        Partition::Centre,
        Partition::LeftThird,
        Partition::CentreThird,
        Partition::RightThird,
        Partition::Left2Thirds,
        Partition::Right2Thirds,
        Partition::TopLeftSix,
        Partition::TopCentreSix,
        Partition::TopRightSix,
        Partition::BotLeftSix,
        Partition::BotCentreSix,
        Partition::BotRightSix,
    ];

    /// Canonical catalog name (`"topLeft"`, `"left2Thirds"`, …).
    pub fn name(self) -> &'static str {
        match self {
            Partition::Left => "left",
            Partition::Right => "right",
            Partition::Up => "up",
            Partition::Down => "down",
            Partition::TopLeft => "topLeft",
            Partition::TopRight => "topRight",
            Partition::BottomLeft => "bottomLeft",
            Partition::BottomRight => "bottomRight",
            Partition::Centre => "centre",
            Partition::LeftThird => "leftThird",
            Partition::CentreThird => "centreThird",
            Partition::RightThird => "rightThird",
            Partition::Left2Thirds => "left2Thirds",
            Partition::Right2Thirds => "right2Thirds",
            Partition::TopLeftSix => "topLeftSix",
            Partition::TopCentreSix => "topCentreSix",
            Partition::TopRightSix => "topRightSix",
            Partition::BotLeftSix => "botLeftSix",
            Partition::BotCentreSix => "botCentreSix",
            Partition::BotRightSix => "botRightSix",
        }
    }

    /// Edge fractions `(left, top, right, bottom)` of the parent frame.
    fn edges(self) -> (f64, f64, f64, f64) {
        match self {
            Partition::Left => (0.0, 0.0, HALF, 1.0),
            Partition::Right => (HALF, 0.0, 1.0, 1.0),
            Partition::Up => (0.0, 0.0, 1.0, HALF),
            Partition::Down => (0.0, HALF, 1.0, 1.0),
            Partition::TopLeft => (0.0, 0.0, HALF, HALF),
            Partition::TopRight => (HALF, 0.0, 1.0, HALF),
            Partition::BottomLeft => (0.0, HALF, HALF, 1.0),
            Partition::BottomRight => (HALF, HALF, 1.0, 1.0),
            Partition::Centre => (QUARTER, QUARTER, THREE_QUARTERS, THREE_QUARTERS),
            Partition::LeftThird => (0.0, 0.0, THIRD, 1.0),
            Partition::CentreThird => (THIRD, 0.0, TWO_THIRDS, 1.0),
            Partition::RightThird => (TWO_THIRDS, 0.0, 1.0, 1.0),
            Partition::Left2Thirds => (0.0, 0.0, TWO_THIRDS, 1.0),
            Partition::Right2Thirds => (THIRD, 0.0, 1.0, 1.0),
            Partition::TopLeftSix => (0.0, 0.0, THIRD, HALF),
            Partition::TopCentreSix => (THIRD, 0.0, TWO_THIRDS, HALF),
            Partition::TopRightSix => (TWO_THIRDS, 0.0, 1.0, HALF),
            Partition::BotLeftSix => (0.0, HALF, THIRD, 1.0),
            Partition::BotCentreSix => (THIRD, HALF, TWO_THIRDS, 1.0),
            Partition::BotRightSix => (TWO_THIRDS, HALF, 1.0, 1.0),
        }
    }

    /// Compute this partition of `parent`.
    ///
    /// Pure: the result depends on nothing but the arguments.  Every
    /// coordinate is anchored on the parent's origin and rounded to a whole
    /// unit, so the result stays within `parent` up to half a unit per edge.
    pub fn resolve(self, parent: &Frame) -> Frame {
        let (fl, ft, fr, fb) = self.edges();
        let left = normalize(parent.x, fl * parent.width);
        let top = normalize(parent.y, ft * parent.height);
        let right = normalize(parent.x, fr * parent.width);
        let bottom = normalize(parent.y, fb * parent.height);
        Frame::new(left, top, right - left, bottom - top)
    }
}

/// Resolve a partition by its textual name.
///
/// Unlike [`Partition::resolve`] this can fail: a name outside the catalog
/// yields [`PartitionError`] and no frame at all.
pub fn resolve(parent: &Frame, name: &str) -> Result<Frame, PartitionError> {
    let partition: Partition = name.parse()?;
    Ok(partition.resolve(parent))
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Partition {
    type Err = PartitionError;

    /// Case-insensitive; `_`, `-` and whitespace are ignored, and the
    /// American spellings `center…` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(|c| c.to_lowercase())
            .collect::<String>()
            .replace("center", "centre");
        Partition::ALL
            .iter()
            .copied()
            .find(|p| p.name().to_lowercase() == normalized)
            .ok_or_else(|| PartitionError(s.to_string()))
    }
}

impl Serialize for Partition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Partition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(x: f64, y: f64, w: f64, h: f64) -> Frame {
        Frame::new(x, y, w, h)
    }

    /// Parents with awkward sizes and offsets, including negative origins
    /// and fractional values that force rounding.
    fn parents() -> Vec<Frame> {
        vec![
            frame(0.0, 0.0, 1000.0, 800.0),
            frame(200.0, 100.0, 1000.0, 800.0),
            frame(0.0, 25.0, 1920.0, 1055.0),
            frame(-1280.0, -300.0, 1279.0, 1023.0),
            frame(3840.5, 0.0, 1001.0, 767.0),
            frame(10.0, 10.0, 7.0, 5.0),
        ]
    }

    #[test]
    fn top_left_quarter() {
        let r = Partition::TopLeft.resolve(&frame(0.0, 0.0, 1000.0, 800.0));
        assert_eq!(r, frame(0.0, 0.0, 500.0, 400.0));
    }

    #[test]
    fn halves_tile_when_the_split_lands_on_half_a_pixel() {
        // -1921 + 960.5 = -960.5, which rounds to -961.
        let parent = frame(-1921.0, 0.0, 1921.0, 1000.0);
        let left = Partition::Left.resolve(&parent);
        let right = Partition::Right.resolve(&parent);
        assert_eq!(left, frame(-1921.0, 0.0, 960.0, 1000.0));
        assert_eq!(right, frame(-961.0, 0.0, 961.0, 1000.0));
        assert_eq!(left.max_x(), right.x);
        assert_eq!(left.width + right.width, parent.width);
    }

    #[test]
    fn centre_third() {
        let r = Partition::CentreThird.resolve(&frame(0.0, 0.0, 900.0, 600.0));
        assert_eq!(r, frame(300.0, 0.0, 300.0, 600.0));
    }

    #[test]
    fn bottom_right_propagates_parent_origin() {
        let r = Partition::BottomRight.resolve(&frame(200.0, 100.0, 1000.0, 800.0));
        assert_eq!(r, frame(700.0, 500.0, 500.0, 400.0));
    }

    #[test]
    fn centre_is_half_size_and_centred() {
        let p = frame(100.0, 50.0, 1600.0, 1000.0);
        let r = Partition::Centre.resolve(&p);
        assert_eq!(r, frame(500.0, 300.0, 800.0, 500.0));
        assert_eq!(r.center(), p.center());
    }

    #[test]
    fn two_thirds_overlap_centre_third() {
        let p = frame(0.0, 0.0, 1200.0, 900.0);
        assert_eq!(Partition::Left2Thirds.resolve(&p), frame(0.0, 0.0, 800.0, 900.0));
        assert_eq!(Partition::Right2Thirds.resolve(&p), frame(400.0, 0.0, 800.0, 900.0));
    }

    #[test]
    fn sixths_use_thirds_and_halves() {
        let p = frame(0.0, 0.0, 1200.0, 900.0);
        assert_eq!(Partition::TopCentreSix.resolve(&p), frame(400.0, 0.0, 400.0, 450.0));
        assert_eq!(Partition::BotRightSix.resolve(&p), frame(800.0, 450.0, 400.0, 450.0));
    }

    #[test]
    fn every_partition_is_contained() {
        for parent in parents() {
            for p in Partition::ALL {
                let r = p.resolve(&parent);
                assert!(
                    parent.contains_frame(&r, 1.0),
                    "{} of {:?} escaped: {:?}",
                    p,
                    parent,
                    r
                );
                assert!(r.width >= 0.0 && r.height >= 0.0);
            }
        }
    }

    /// Assert that `parts` cover `parent` exactly: total area matches and no
    /// two parts overlap.
    fn assert_tiles(parent: &Frame, parts: &[Partition]) {
        let frames: Vec<Frame> = parts.iter().map(|p| p.resolve(parent)).collect();
        for (i, a) in frames.iter().enumerate() {
            for b in &frames[i + 1..] {
                assert_eq!(a.intersection_area(b), 0.0, "{:?} overlaps {:?}", a, b);
            }
        }
        let left = frames.iter().map(|f| f.x).fold(f64::INFINITY, f64::min);
        let top = frames.iter().map(|f| f.y).fold(f64::INFINITY, f64::min);
        let right = frames.iter().map(|f| f.max_x()).fold(f64::NEG_INFINITY, f64::max);
        let bottom = frames.iter().map(|f| f.max_y()).fold(f64::NEG_INFINITY, f64::max);
        let hull = frame(left, top, right - left, bottom - top);
        let total: f64 = frames.iter().map(Frame::area).sum();
        assert_eq!(total, hull.area(), "gap inside {:?}", parent);
        assert!((hull.x - parent.x).abs() <= 1.0);
        assert!((hull.y - parent.y).abs() <= 1.0);
        assert!((hull.max_x() - parent.max_x()).abs() <= 1.0);
        assert!((hull.max_y() - parent.max_y()).abs() <= 1.0);
    }

    #[test]
    fn halves_tile() {
        for parent in parents() {
            assert_tiles(&parent, &[Partition::Left, Partition::Right]);
            assert_tiles(&parent, &[Partition::Up, Partition::Down]);
        }
    }

    #[test]
    fn quarters_tile() {
        for parent in parents() {
            assert_tiles(
                &parent,
                &[
                    Partition::TopLeft,
                    Partition::TopRight,
                    Partition::BottomLeft,
                    Partition::BottomRight,
                ],
            );
        }
    }

    #[test]
    fn quarters_reconstruct_integral_parent_exactly() {
        let parent = frame(200.0, 100.0, 1001.0, 799.0);
        let tl = Partition::TopLeft.resolve(&parent);
        let br = Partition::BottomRight.resolve(&parent);
        assert_eq!((tl.x, tl.y), (parent.x, parent.y));
        assert_eq!((br.max_x(), br.max_y()), (parent.max_x(), parent.max_y()));
    }

    #[test]
    fn thirds_and_sixths_tile() {
        for parent in parents() {
            assert_tiles(
                &parent,
                &[Partition::LeftThird, Partition::CentreThird, Partition::RightThird],
            );
            assert_tiles(&parent, &[Partition::LeftThird, Partition::Right2Thirds]);
            assert_tiles(&parent, &[Partition::Left2Thirds, Partition::RightThird]);
            assert_tiles(
                &parent,
                &[
                    Partition::TopLeftSix,
                    Partition::TopCentreSix,
                    Partition::TopRightSix,
                    Partition::BotLeftSix,
                    Partition::BotCentreSix,
                    Partition::BotRightSix,
                ],
            );
        }
    }

    #[test]
    fn resolve_is_deterministic() {
        for parent in parents() {
            for p in Partition::ALL {
                assert_eq!(p.resolve(&parent), p.resolve(&parent));
            }
        }
    }

    #[test]
    fn resolve_by_name() {
        let p = frame(0.0, 0.0, 1000.0, 800.0);
        assert_eq!(resolve(&p, "topLeft"), Ok(frame(0.0, 0.0, 500.0, 400.0)));
        assert_eq!(resolve(&p, "center"), Ok(Partition::Centre.resolve(&p)));
    }

    #[test]
    fn resolve_unknown_name_fails() {
        let p = frame(0.0, 0.0, 1000.0, 800.0);
        assert_eq!(
            resolve(&p, "leftQuarter"),
            Err(PartitionError("leftQuarter".into()))
        );
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for p in Partition::ALL {
            assert_eq!(p.name().parse::<Partition>(), Ok(p));
        }
        assert_eq!("TOP_LEFT".parse::<Partition>(), Ok(Partition::TopLeft));
        assert_eq!("bot-centre-six".parse::<Partition>(), Ok(Partition::BotCentreSix));
    }

    #[test]
    fn serde_uses_catalog_names() {
        let json = serde_json::to_string(&Partition::Left2Thirds).unwrap();
        assert_eq!(json, r#""left2Thirds""#);
        let p: Partition = serde_json::from_str(r#""topRightSix""#).unwrap();
        assert_eq!(p, Partition::TopRightSix);
        assert!(serde_json::from_str::<Partition>(r#""nowhere""#).is_err());
    }
}
