//! Symbol Processor
//!
//! The closed-loop heart of the receiver. Consumes differentially decoded
//! phase samples and produces dibit decisions while tracking the observed
//! symbol period as feedback for the differential decoder.
//!
//! ## Algorithm
//!
//! Every incoming phase sample is unwrapped against its predecessor and
//! pushed into a duplicated 8-entry delay line. A fractional countdown
//! (`sample_point`) decremented once per sample marks the symbol instant:
//! when it drops below 1.0 the symbol phase is interpolated at the
//! fractional remainder, hard-decided, correlated against the sync pattern,
//! and fed to the timing-error detector whose output drives two cooperating
//! adjustments — a small integral correction of the observed symbol period
//! (clamped to ±0.05% of nominal) and a proportional bias on the countdown
//! re-arm. The decision is then re-evaluated through the LMS equalizer and
//! emitted through a 24-dibit delay line that keeps the output aligned with
//! the sync correlator's 24-symbol lag.
//!
//! A per-sample phase jump beyond the noise gate marks the surrounding
//! symbol noisy: the timing loop and the equalizer adaptation both hold for
//! that symbol.
//!
//! On a sync detection the delay line is overwritten with the known-true
//! pattern, the pattern's first dibit is emitted in place of the current
//! decision, and (when enabled) the equalizer is retrained from the
//! confirmed symbols.

use crate::config::DemodConfig;
use crate::dibit::Dibit;
use crate::dibit_delay_line::DibitDelayLine;
use crate::interpolator;
use crate::lms_equalizer::LmsEqualizer;
use crate::sync_detector::SyncDetector;
use crate::sync_pattern;
use crate::timing_error;
use std::f32::consts::PI;

const TWO_PI: f32 = 2.0 * PI;

/// Largest tolerated deviation of the observed symbol period from nominal.
const MAX_SYMBOL_PERIOD_DEVIATION: f32 = 0.0005;

/// Length of the phase delay line feeding the interpolator.
const DELAY_LINE_LENGTH: usize = interpolator::TAPS_PER_PHASE;

/// Running counters for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DemodStats {
    /// Symbol instants processed since construction or reset.
    pub symbols: u64,
    /// Sync patterns detected.
    pub sync_detections: u64,
    /// Correlation score at the most recent detection.
    pub last_sync_score: f32,
    /// Hard-decision bit errors against the pattern at the last detection.
    pub last_sync_bit_errors: u32,
}

/// Decision-directed DQPSK symbol extractor with symbol-period tracking.
#[derive(Debug, Clone)]
pub struct SymbolProcessor {
    nominal_samples_per_symbol: f32,
    observed_samples_per_symbol: f32,
    max_samples_per_symbol: f32,
    min_samples_per_symbol: f32,
    /// Fractional countdown to the next symbol instant.
    sample_point: f32,
    /// Previous unwrapped phase sample.
    previous: f32,
    /// Duplicated delay line; the interpolator reads 8 contiguous entries.
    delay_line: [f32; DELAY_LINE_LENGTH * 2],
    delay_line_pointer: usize,
    noise_threshold: f32,
    noise_multiplier: f32,
    noisy: bool,
    sample_counter_gain: f32,
    observed_gain: f32,
    sync_threshold: f32,
    sync_retune: bool,
    /// Rolling window of the last 24 hard decisions, two bits per symbol.
    sync_register: u64,
    symbols: Vec<Dibit>,
    sync_detector: SyncDetector,
    equalizer: LmsEqualizer,
    dibit_delay: DibitDelayLine,
    stats: DemodStats,
}

impl SymbolProcessor {
    /// Construct a processor from a validated configuration.
    pub fn new(config: &DemodConfig) -> Self {
        let mut processor = Self {
            nominal_samples_per_symbol: 0.0,
            observed_samples_per_symbol: 0.0,
            max_samples_per_symbol: 0.0,
            min_samples_per_symbol: 0.0,
            sample_point: 0.0,
            previous: 0.0,
            delay_line: [0.0; DELAY_LINE_LENGTH * 2],
            delay_line_pointer: 0,
            noise_threshold: 0.0,
            noise_multiplier: config.noise_multiplier,
            noisy: false,
            sample_counter_gain: config.sample_counter_gain,
            observed_gain: config.observed_gain(),
            sync_threshold: config.sync_threshold,
            sync_retune: config.sync_retune,
            sync_register: 0,
            symbols: Vec::new(),
            sync_detector: SyncDetector::new(),
            equalizer: LmsEqualizer::new(config.equalizer_half_length, config.equalizer_step),
            dibit_delay: DibitDelayLine::new(sync_pattern::PATTERN_DIBITS),
            stats: DemodStats::default(),
        };
        processor.set_samples_per_symbol(config.samples_per_symbol());
        processor
    }

    /// Set the nominal symbol period and re-arm the tracking loop around it.
    pub fn set_samples_per_symbol(&mut self, samples_per_symbol: f32) {
        self.nominal_samples_per_symbol = samples_per_symbol;
        self.observed_samples_per_symbol = samples_per_symbol;
        self.sample_point = samples_per_symbol;
        self.max_samples_per_symbol = samples_per_symbol * (1.0 + MAX_SYMBOL_PERIOD_DEVIATION);
        self.min_samples_per_symbol = samples_per_symbol * (1.0 - MAX_SYMBOL_PERIOD_DEVIATION);
        self.noise_threshold = TWO_PI / samples_per_symbol * self.noise_multiplier;
    }

    /// Observed symbol period, adjusted after every symbol instant. The
    /// demodulator uses this to place the differential interpolation point.
    pub fn observed_samples_per_symbol(&self) -> f32 {
        self.observed_samples_per_symbol
    }

    /// Running counters.
    pub fn stats(&self) -> DemodStats {
        self.stats
    }

    /// Retrieve accumulated symbols, clearing the internal buffer.
    pub fn take_symbols(&mut self) -> Vec<Dibit> {
        std::mem::take(&mut self.symbols)
    }

    /// Re-initialize all loop state; the nominal symbol period is kept.
    pub fn reset(&mut self) {
        self.set_samples_per_symbol(self.nominal_samples_per_symbol);
        self.previous = 0.0;
        self.delay_line = [0.0; DELAY_LINE_LENGTH * 2];
        self.delay_line_pointer = 0;
        self.noisy = false;
        self.sync_register = 0;
        self.symbols.clear();
        self.sync_detector.reset();
        self.equalizer.reset();
        self.dibit_delay.reset();
        self.stats = DemodStats::default();
    }

    /// Process a block of differentially decoded phase samples.
    pub fn process(&mut self, samples: &[f32]) {
        for &raw in samples {
            self.sample_point -= 1.0;
            let mut current = raw;
            let previous = self.previous;

            // Unroll phase wrapping across the ±π discontinuity.
            if (current - previous).abs() > PI {
                if current > 0.0 && current < PI && previous < 0.0 {
                    current -= TWO_PI;
                } else if current < 0.0 && current > -PI && previous > 0.0 {
                    current += TWO_PI;
                }
            }

            if (current - previous).abs() > self.noise_threshold {
                self.noisy = true;
            }

            self.delay_line[self.delay_line_pointer] = current;
            self.delay_line[self.delay_line_pointer + DELAY_LINE_LENGTH] = current;
            self.delay_line_pointer = (self.delay_line_pointer + 1) % DELAY_LINE_LENGTH;

            let mut symbol_instant = false;
            if self.sample_point < 1.0 {
                symbol_instant = true;
                self.process_symbol();
            }

            self.previous = current;
            if symbol_instant {
                self.noisy = false;
            }
        }
    }

    /// Handle one symbol instant: decide, update the loops, emit.
    fn process_symbol(&mut self) {
        self.stats.symbols += 1;
        let mu = self.sample_point;
        let pointer = self.delay_line_pointer;

        let interpolated = interpolator::filter(&self.delay_line, pointer, mu);
        let mut symbol = Dibit::decide(interpolated);

        let score = self.sync_detector.process(interpolated);
        self.sync_register =
            ((self.sync_register << 2) | u64::from(symbol.value())) & sync_pattern::PATTERN_MASK;

        // The interpolated point sits between delay-line entries 3 and 4;
        // those neighbors give the phasor rotation direction.
        let error = if self.noisy {
            0.0
        } else {
            timing_error::calculate(
                symbol,
                self.delay_line[pointer + 3],
                interpolated,
                self.delay_line[pointer + 4],
            )
        };

        self.observed_samples_per_symbol += error * self.observed_gain;
        if !self.observed_samples_per_symbol.is_finite() {
            self.observed_samples_per_symbol = self.nominal_samples_per_symbol;
        }
        self.observed_samples_per_symbol = self
            .observed_samples_per_symbol
            .clamp(self.min_samples_per_symbol, self.max_samples_per_symbol);

        // Re-arm the countdown, biased by the instantaneous timing error.
        self.sample_point += self.observed_samples_per_symbol + error * self.sample_counter_gain;

        if self.noisy {
            self.equalizer.process_no_update(symbol, interpolated);
        } else {
            let equalized = self.equalizer.process(symbol, interpolated);
            symbol = Dibit::decide(equalized);
        }

        if score > self.sync_threshold {
            self.stats.sync_detections += 1;
            self.stats.last_sync_score = score;
            self.stats.last_sync_bit_errors =
                (self.sync_register ^ sync_pattern::BASE_STATION_DATA).count_ones();
            tracing::debug!(
                score,
                bit_errors = self.stats.last_sync_bit_errors,
                symbols = self.stats.symbols,
                "sync pattern detected"
            );
            self.dibit_delay.update(&sync_pattern::DIBITS);
            self.symbols.push(sync_pattern::DIBITS[0]);
            if self.sync_retune {
                self.equalizer.sync_detected(&sync_pattern::DIBITS);
            }
        } else {
            self.symbols.push(self.dibit_delay.insert(symbol));
        }
    }
}
