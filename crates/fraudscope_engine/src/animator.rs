use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink};

#[derive(Debug, Clone)]
pub struct AnimatorSettings {
    pub cadence: Duration,
    /// Exclusive upper bound of the per-tick transaction increment.
    pub max_increment: u64,
    pub fraud_probability: f64,
}

impl Default for AnimatorSettings {
    fn default() -> Self {
        Self {
            cadence: Duration::from_secs(5),
            max_increment: 5,
            fraud_probability: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterIncrement {
    pub transactions: u64,
    pub fraud: u64,
}

pub fn draw_increment<R: Rng + ?Sized>(
    rng: &mut R,
    settings: &AnimatorSettings,
) -> CounterIncrement {
    let transactions = if settings.max_increment == 0 {
        0
    } else {
        rng.gen_range(0..settings.max_increment)
    };
    let probability = if settings.fraud_probability.is_nan() {
        0.0
    } else {
        settings.fraud_probability.clamp(0.0, 1.0)
    };
    CounterIncrement {
        transactions,
        fraud: u64::from(rng.gen_bool(probability)),
    }
}

/// Emits one increment per cadence until `cancel` fires. The first tick lands
/// one full period after start.
pub async fn run_animator(
    settings: AnimatorSettings,
    cancel: CancellationToken,
    sink: &dyn EventSink,
) {
    let period = settings.cadence.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut rng = StdRng::from_entropy();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let increment = draw_increment(&mut rng, &settings);
                sink.emit(EngineEvent::CountersAdvanced {
                    transactions: increment.transactions,
                    fraud: increment.fraud,
                });
            }
        }
    }
}
