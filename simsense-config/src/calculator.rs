//! Error calculator and integrator configuration

use std::sync::Arc;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use simsense_core::{
    uncertainty::{
        RandErrNormPercent, RandErrNormal, RandErrUnifPercent, RandErrUniform, SysErrDigitisation,
        SysErrNormPercent, SysErrNormal, SysErrPosition, SysErrSaturation, SysErrSpatialAverage,
        SysErrTemporalAverage, SysErrUnifPercent, SysErrUniform,
    },
    ErrCalculator, ErrorIntegrator, IntegrationMode, MeasShape, SampleField,
};

use crate::{ConfigError, ConfigResult};

/// What field-based calculators re-sample
#[derive(Debug, Clone)]
pub struct FieldContext {
    /// Field the sensors sit in
    pub field: Arc<dyn SampleField>,
    /// Nominal sensor positions (n, 3)
    pub positions: Array2<f64>,
    /// Sample times, `None` for the field's own steps
    pub sample_times: Option<Array1<f64>>,
}

/// One error calculator, tagged by `"type"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculatorConfig {
    /// Uniform noise on [low, high)
    RandErrUniform {
        /// Lower bound
        low: f64,
        /// Upper bound
        high: f64,
        /// Generator seed
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Uniform noise as a percentage of the basis
    RandErrUnifPercent {
        /// Lower bound (%)
        low_percent: f64,
        /// Upper bound (%)
        high_percent: f64,
        /// Generator seed
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Zero-mean normal noise
    RandErrNormal {
        /// Standard deviation
        std: f64,
        /// Generator seed
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Normal noise as a percentage of the basis
    RandErrNormPercent {
        /// Standard deviation (%)
        std_percent: f64,
        /// Generator seed
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Uniform offset held over time
    SysErrUniform {
        /// Lower bound
        low: f64,
        /// Upper bound
        high: f64,
        /// Generator seed
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Uniform offset as a percentage of the basis
    SysErrUnifPercent {
        /// Lower bound (%)
        low_percent: f64,
        /// Upper bound (%)
        high_percent: f64,
        /// Generator seed
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Normal offset held over time
    SysErrNormal {
        /// Standard deviation
        std: f64,
        /// Generator seed
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Normal offset as a percentage of the basis
    SysErrNormPercent {
        /// Standard deviation (%)
        std_percent: f64,
        /// Generator seed
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Quantisation to the logger resolution
    SysErrDigitisation {
        /// Resolution in bits per unit
        bits_per_unit: f64,
    },
    /// Clipping to the measurable range
    SysErrSaturation {
        /// Lowest measurable value
        meas_min: f64,
        /// Highest measurable value
        meas_max: f64,
    },
    /// Sensor placement uncertainty
    SysErrPosition {
        /// Standard deviation per axis, `null` to keep the axis fixed
        std_by_ax: [Option<f64>; 3],
        /// Generator seed
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Finite sensor footprint
    SysErrSpatialAverage {
        /// Box half width per axis
        half_widths: [f64; 3],
        /// Grid points along each averaged axis
        points_per_axis: usize,
    },
    /// Finite integration time
    SysErrTemporalAverage {
        /// Window length ending at each sample time
        window: f64,
        /// Evenly spaced samples in the window
        points_in_window: usize,
    },
}

impl CalculatorConfig {
    /// Type tag as written in JSON
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RandErrUniform { .. } => "rand_err_uniform",
            Self::RandErrUnifPercent { .. } => "rand_err_unif_percent",
            Self::RandErrNormal { .. } => "rand_err_normal",
            Self::RandErrNormPercent { .. } => "rand_err_norm_percent",
            Self::SysErrUniform { .. } => "sys_err_uniform",
            Self::SysErrUnifPercent { .. } => "sys_err_unif_percent",
            Self::SysErrNormal { .. } => "sys_err_normal",
            Self::SysErrNormPercent { .. } => "sys_err_norm_percent",
            Self::SysErrDigitisation { .. } => "sys_err_digitisation",
            Self::SysErrSaturation { .. } => "sys_err_saturation",
            Self::SysErrPosition { .. } => "sys_err_position",
            Self::SysErrSpatialAverage { .. } => "sys_err_spatial_average",
            Self::SysErrTemporalAverage { .. } => "sys_err_temporal_average",
        }
    }

    /// Whether the calculator re-samples the field
    pub fn needs_field(&self) -> bool {
        matches!(
            self,
            Self::SysErrPosition { .. }
                | Self::SysErrSpatialAverage { .. }
                | Self::SysErrTemporalAverage { .. }
        )
    }

    /// Construct the live calculator
    pub fn build(&self, ctx: Option<&FieldContext>) -> ConfigResult<Box<dyn ErrCalculator>> {
        let field_ctx = || {
            ctx.ok_or(ConfigError::FieldRequired {
                calculator: self.type_name(),
            })
        };

        let calc: Box<dyn ErrCalculator> = match *self {
            Self::RandErrUniform { low, high, seed } => {
                Box::new(RandErrUniform::new(low, high, seed)?)
            }
            Self::RandErrUnifPercent { low_percent, high_percent, seed } => {
                Box::new(RandErrUnifPercent::new(low_percent, high_percent, seed)?)
            }
            Self::RandErrNormal { std, seed } => Box::new(RandErrNormal::new(std, seed)?),
            Self::RandErrNormPercent { std_percent, seed } => {
                Box::new(RandErrNormPercent::new(std_percent, seed)?)
            }
            Self::SysErrUniform { low, high, seed } => Box::new(SysErrUniform::new(low, high, seed)?),
            Self::SysErrUnifPercent { low_percent, high_percent, seed } => {
                Box::new(SysErrUnifPercent::new(low_percent, high_percent, seed)?)
            }
            Self::SysErrNormal { std, seed } => Box::new(SysErrNormal::new(std, seed)?),
            Self::SysErrNormPercent { std_percent, seed } => {
                Box::new(SysErrNormPercent::new(std_percent, seed)?)
            }
            Self::SysErrDigitisation { bits_per_unit } => {
                Box::new(SysErrDigitisation::new(bits_per_unit)?)
            }
            Self::SysErrSaturation { meas_min, meas_max } => {
                Box::new(SysErrSaturation::new(meas_min, meas_max)?)
            }
            Self::SysErrPosition { std_by_ax, seed } => {
                let ctx = field_ctx()?;
                Box::new(SysErrPosition::new(
                    Arc::clone(&ctx.field),
                    ctx.positions.clone(),
                    std_by_ax,
                    ctx.sample_times.clone(),
                    seed,
                )?)
            }
            Self::SysErrSpatialAverage { half_widths, points_per_axis } => {
                let ctx = field_ctx()?;
                Box::new(SysErrSpatialAverage::new(
                    Arc::clone(&ctx.field),
                    ctx.positions.clone(),
                    half_widths,
                    points_per_axis,
                    ctx.sample_times.clone(),
                )?)
            }
            Self::SysErrTemporalAverage { window, points_in_window } => {
                let ctx = field_ctx()?;
                Box::new(SysErrTemporalAverage::new(
                    Arc::clone(&ctx.field),
                    ctx.positions.clone(),
                    window,
                    points_in_window,
                    ctx.sample_times.clone(),
                )?)
            }
        };
        Ok(calc)
    }
}

/// Calculators of one error stage and how they combine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegratorConfig {
    /// Composition mode, static unless given
    #[serde(default)]
    pub mode: IntegrationMode,
    /// Calculators in application order
    #[serde(default)]
    pub calculators: Vec<CalculatorConfig>,
}

impl IntegratorConfig {
    /// Construct the integrator for measurements of `meas_shape`
    pub fn build(
        &self,
        meas_shape: MeasShape,
        ctx: Option<&FieldContext>,
    ) -> ConfigResult<ErrorIntegrator> {
        let calcs = self
            .calculators
            .iter()
            .map(|calc| calc.build(ctx))
            .collect::<ConfigResult<Vec<_>>>()?;

        log::debug!(
            "Built {:?} integrator with {} calculators for {:?}",
            self.mode,
            calcs.len(),
            meas_shape
        );
        Ok(ErrorIntegrator::new(calcs, meas_shape).with_mode(self.mode))
    }
}
