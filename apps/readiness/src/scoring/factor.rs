//! Scoring primitives shared by both readiness variants.
//!
//! A score is an ordered list of factors. Each factor turns some raw signal
//! into points through a curve and is clamped to its own cap; the fold sums
//! the factors and clamps the total to [0, 100].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::MAX_SCORE;

// ────────────────────────────────────────────────────────────────────────────
// Curves
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    /// `cap · (1 − e^(−x / scale))`: steep for the first units, flat near the cap.
    Saturating { scale: f64 },
    /// `x · per_unit`, cut off at the cap.
    Linear { per_unit: f64 },
    /// `cap · x / max`, for signals that are already a bounded percentage.
    Ratio { max: f64 },
}

impl Curve {
    pub fn apply(&self, raw: f64, cap: f64) -> f64 {
        if !raw.is_finite() || raw <= 0.0 {
            return 0.0;
        }
        let points = match *self {
            Curve::Saturating { scale } if scale > 0.0 => cap * (1.0 - (-raw / scale).exp()),
            Curve::Linear { per_unit } => raw * per_unit,
            Curve::Ratio { max } if max > 0.0 => cap * (raw / max),
            _ => 0.0,
        };
        clamp_to_cap(points, cap)
    }
}

pub fn clamp_to_cap(points: f64, cap: f64) -> f64 {
    if points.is_finite() {
        points.clamp(0.0, cap.max(0.0))
    } else {
        0.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Factor abstraction
// ────────────────────────────────────────────────────────────────────────────

/// One named contribution to a score, bounded by its cap.
pub trait ScoreFactor<S: ?Sized> {
    fn name(&self) -> &'static str;

    fn cap(&self) -> f64;

    /// Points before clamping.
    fn evaluate(&self, input: &S) -> f64;

    fn score(&self, input: &S) -> f64 {
        clamp_to_cap(self.evaluate(input), self.cap())
    }
}

impl<S: ?Sized, F: ScoreFactor<S> + ?Sized> ScoreFactor<S> for Box<F> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn cap(&self) -> f64 {
        (**self).cap()
    }

    fn evaluate(&self, input: &S) -> f64 {
        (**self).evaluate(input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Improvement hint attached to a factor, surfaced when the factor scores low.
#[derive(Debug, Clone, Copy)]
pub struct Advice {
    pub priority: Priority,
    pub message: &'static str,
}

/// A single curve over a single raw signal.
pub struct CurveFactor<S: ?Sized> {
    pub name: &'static str,
    pub cap: f64,
    pub curve: Curve,
    pub signal: fn(&S) -> f64,
    pub advice: Option<Advice>,
}

impl<S: ?Sized> CurveFactor<S> {
    pub fn new(name: &'static str, cap: f64, curve: Curve, signal: fn(&S) -> f64) -> Self {
        Self {
            name,
            cap,
            curve,
            signal,
            advice: None,
        }
    }

    pub fn with_advice(mut self, priority: Priority, message: &'static str) -> Self {
        self.advice = Some(Advice { priority, message });
        self
    }
}

impl<S: ?Sized> ScoreFactor<S> for CurveFactor<S> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn cap(&self) -> f64 {
        self.cap
    }

    fn evaluate(&self, input: &S) -> f64 {
        self.curve.apply((self.signal)(input), self.cap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Keep fractional points; round only the grand total.
    Final,
    /// Round every factor (and sub-factor) to whole points before summing.
    PerFactor,
}

impl Rounding {
    fn apply(self, points: f64) -> f64 {
        match self {
            Rounding::Final => points,
            Rounding::PerFactor => points.round(),
        }
    }
}

/// A factor built from several curve factors, summed and clamped to one cap.
pub struct CompositeFactor<S: ?Sized> {
    pub name: &'static str,
    pub cap: f64,
    pub parts: Vec<CurveFactor<S>>,
    pub rounding: Rounding,
}

impl<S: ?Sized> CompositeFactor<S> {
    pub fn new(
        name: &'static str,
        cap: f64,
        rounding: Rounding,
        parts: Vec<CurveFactor<S>>,
    ) -> Self {
        Self {
            name,
            cap,
            parts,
            rounding,
        }
    }

    /// Each part with its (rounding-adjusted) score, in declaration order.
    pub fn part_scores<'a>(
        &'a self,
        input: &'a S,
    ) -> impl Iterator<Item = (&'a CurveFactor<S>, f64)> + 'a {
        self.parts
            .iter()
            .map(move |part| (part, self.rounding.apply(part.score(input))))
    }
}

impl<S: ?Sized> ScoreFactor<S> for CompositeFactor<S> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn cap(&self) -> f64 {
        self.cap
    }

    fn evaluate(&self, input: &S) -> f64 {
        self.part_scores(input).map(|(_, points)| points).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fold
// ────────────────────────────────────────────────────────────────────────────

/// Total readiness score plus the points each factor contributed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total: u32,
    pub breakdown: BTreeMap<String, f64>,
}

/// Sums the factors in order and clamps the total to [0, 100].
///
/// Factors scoring zero are left out of the breakdown. When the raw sum
/// exceeds the maximum, every entry is scaled down proportionally so the
/// breakdown still sums (after rounding) to the reported total.
pub fn fold_factors<S, F>(factors: &[F], input: &S, rounding: Rounding) -> ScoreResult
where
    S: ?Sized,
    F: ScoreFactor<S>,
{
    let mut breakdown = BTreeMap::new();
    let mut sum = 0.0;

    for factor in factors {
        let points = rounding.apply(factor.score(input));
        if points > 0.0 {
            sum += points;
            breakdown.insert(factor.name().to_string(), points);
        }
    }

    if sum > MAX_SCORE {
        let scale = MAX_SCORE / sum;
        for points in breakdown.values_mut() {
            *points *= scale;
        }
        sum = MAX_SCORE;
    }

    ScoreResult {
        total: sum.round().clamp(0.0, MAX_SCORE) as u32,
        breakdown,
    }
}
