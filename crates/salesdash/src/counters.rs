//! Stat card counters played on the terminal.

use salesdash_common::StatTarget;
use salesdash_graphs::CounterAnimation;
use std::io::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const SEPARATOR: &str = " | ";

/// The four stat counters, advanced in lockstep.
#[derive(Debug, Clone)]
pub struct CounterBoard {
    counters: Vec<(StatTarget, Vec<String>)>,
    interval: Duration,
}

impl CounterBoard {
    /// Precomputes every frame of every counter.
    pub fn new(counters: Vec<(StatTarget, CounterAnimation)>) -> Self {
        let interval = counters
            .first()
            .map(|(_, c)| c.frame_interval())
            .unwrap_or(Duration::from_millis(16));
        Self {
            counters: counters
                .into_iter()
                .map(|(target, anim)| (target, anim.frame_texts()))
                .collect(),
            interval,
        }
    }

    /// Number of frames until every counter has settled.
    pub fn frame_count(&self) -> usize {
        self.counters
            .iter()
            .map(|(_, texts)| texts.len())
            .max()
            .unwrap_or(0)
    }

    /// Frame `index` as one status line. Finished counters hold their last value.
    pub fn line(&self, index: usize) -> String {
        self.counters
            .iter()
            .filter_map(|(target, texts)| {
                let text = texts.get(index).or_else(|| texts.last())?;
                Some(format!("{}: {}", target.label(), text))
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    /// The settled values.
    pub fn final_line(&self) -> String {
        self.line(self.frame_count().saturating_sub(1))
    }

    /// Rewrites one line of `out` per frame. Returns `false` if cancelled first.
    pub async fn play<W: Write>(&self, out: &mut W, token: &CancellationToken) -> std::io::Result<bool> {
        let mut ticker = tokio::time::interval(self.interval);
        for index in 0..self.frame_count() {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    writeln!(out)?;
                    return Ok(false);
                }
                _ = ticker.tick() => {}
            }
            write!(out, "\r{}", self.line(index))?;
            out.flush()?;
        }
        writeln!(out)?;
        Ok(true)
    }

    /// Writes only the settled values.
    pub fn print_final<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", self.final_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesdash_config::AnimationConfig;

    fn board(values: [f64; 4], duration_ms: u64) -> CounterBoard {
        let config = AnimationConfig {
            duration_ms,
            ..AnimationConfig::default()
        };
        CounterBoard::new(
            StatTarget::ALL
                .into_iter()
                .zip(values)
                .map(|(t, v)| (t, CounterAnimation::new(v, t.is_currency(), &config)))
                .collect(),
        )
    }

    #[test]
    fn test_final_line() {
        let board = board([2_297_200.86, 9_994.0, 229.86, 22_638.48], 150);
        assert_eq!(board.frame_count(), 10);
        assert_eq!(
            board.final_line(),
            "Total Sales: $2.30M | Total Orders: 10.0K | Average Sale: $230 | Max Sale: $22.6K"
        );
    }

    #[test]
    fn test_settled_counters_hold() {
        let board = board([0.0, 3.0, 1.0, 1.0], 160);
        assert!(board.line(5).starts_with("Total Sales: $0 |"));
    }

    #[tokio::test]
    async fn test_play_writes_every_frame() {
        let board = board([100.0, 4.0, 25.0, 60.0], 48);
        let mut out = Vec::new();
        let finished = board.play(&mut out, &CancellationToken::new()).await.unwrap();

        assert!(finished);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('\r').count(), board.frame_count());
        assert!(text.ends_with(&format!("{}\n", board.final_line())));
    }

    #[tokio::test]
    async fn test_play_stops_when_cancelled() {
        let board = board([100.0, 4.0, 25.0, 60.0], 1_500);
        let token = CancellationToken::new();
        token.cancel();

        let mut out = Vec::new();
        assert!(!board.play(&mut out, &token).await.unwrap());
    }
}
