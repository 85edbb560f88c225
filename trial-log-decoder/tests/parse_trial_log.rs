//! End-to-end parse of a realistic trial log written to disk

use anyhow::Result;
use std::io::Write;
use trial_log_decoder::{metrics, LogParser, ParserConfig, RewardKind};

const TRIAL_LOG: &str = "\
2021-03-01 10:00:00.000000 Session started
2021-03-01 10:00:00.100000 X=0.00 Z=0.00 Theta=0.0 S=0 MX=0.0 MY=0.0 GainX=1.00 GainY=1.00 Fading=0 RealTimeGainX=0 RealTimeGainY=0 Dark=0
2021-03-01 10:00:00.300000 X=1.00 Z=0.00 Theta=100.0 S=0 MX=0.0 MY=0.0 GainX=1.00 GainY=1.00 Fading=0 RealTimeGainX=0 RealTimeGainY=0 Dark=0
2021-03-01 10:00:00.300000 X=1.00 Z=0.00 Theta=100.0 S=0 MX=0.0 MY=0.0 GainX=1.00 GainY=1.00 Fading=0 RealTimeGainX=0 RealTimeGainY=0 Dark=0
2021-03-01 10:00:01.000000 RewardPositioned X=5.00 Z=5.00
2021-03-01 10:00:01.200000 X=2.00 Z=1.00 Theta=200.0 S=0 MX=0.0 MY=0.0 GainX=1.00 GainY=1.00 Fading=0 RealTimeGainX=0 RealTimeGainY=0 Dark=0
2021-03-01 10:00:02.000000 X=3.00 Z=3.00 Theta=300.0 S=0 MX=0.0 MY=0.0 GainX=1.00 GainY=1.00 Fading=0 RealTimeGainX=0 RealTimeGainY=0 Dark=0
2021-03-01 10:00:02.500000 Manual Reward_activated X=8.00 Z=8.00
2021-03-01 10:00:03.000000 X=5.00 Z=5.00 Theta=400.0 S=0 MX=0.0 MY=0.0 GainX=1.00 GainY=1.00 Fading=0 RealTimeGainX=0 RealTimeGainY=0 Dark=0
2021-03-01 10:00:03.200000 Reward_delivered X=5.00 Z=5.00
2021-03-01 10:00:04.000000 Reward_delivered X=9.00 Z=9.00
2021-03-01 10:00:04.500000 X=6.00 Z=5.00 Theta=500.0 GainX=1.00 GainY=1.00 Fading=0 RealTimeGainX=0 RealTimeGainY=0 Dark=0
2021-03-01 this-position-line-is GainX=broken
";

#[test]
fn parses_a_trial_log_from_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("trial_2021-03-01.txt");
    let mut file = std::fs::File::create(&path)?;
    file.write_all(TRIAL_LOG.as_bytes())?;

    let parser = LogParser::new();
    let parsed = parser.parse_file(&path)?;
    let trial = &parsed.trial;

    // one duplicated sample collapses, the broken line is skipped
    assert_eq!(parsed.stats.position_lines, 7);
    assert_eq!(parsed.stats.duplicate_samples, 1);
    assert_eq!(parsed.stats.malformed_lines, 1);
    assert_eq!(trial.samples().len(), 6);

    // samples are strictly ascending in time
    for pair in trial.samples().windows(2) {
        assert!(pair[0].timestamp < pair[1].timestamp);
    }

    // one automatic and one manual positioning, two deliveries
    assert_eq!(trial.rewards_of(RewardKind::Automatic).count(), 1);
    assert_eq!(trial.rewards_of(RewardKind::Manual).count(), 1);
    assert_eq!(trial.rewards_of(RewardKind::Delivered).count(), 2);

    // the trial anchors on the first position sample here, and duration
    // spans the position series
    assert_eq!(trial.elapsed_secs(trial.samples()[0].timestamp), 0.0);
    assert!((trial.duration_secs() - 4.4).abs() < 1e-9);

    // only the (5, 5) delivery finds its positioned partner; the (9, 9)
    // one is dropped from the metrics
    let deliveries = metrics::pair_deliveries(trial, parser.config().match_tolerance);
    assert_eq!(deliveries.len(), 1);
    let delivery = &deliveries[0];
    assert!((delivery.latency_secs - 2.2).abs() < 1e-9);
    let tortuosity = delivery.tortuosity.expect("segment has net displacement");
    assert!(tortuosity >= 1.0);

    Ok(())
}

#[test]
fn tolerance_rescues_slightly_offset_deliveries() -> Result<()> {
    let log = "\
2021-03-01 10:00:00.000000 X=0.00 Z=0.00 Theta=0.0 GainX=1.00 GainY=1.00 Fading=0 RealTimeGainX=0 RealTimeGainY=0 Dark=0
2021-03-01 10:00:01.000000 RewardPositioned X=5.00 Z=5.00
2021-03-01 10:00:02.000000 X=5.00 Z=5.00 Theta=0.0 GainX=1.00 GainY=1.00 Fading=0 RealTimeGainX=0 RealTimeGainY=0 Dark=0
2021-03-01 10:00:03.000000 Reward_delivered X=5.05 Z=4.95
";

    let exact = LogParser::new();
    assert!(metrics::pair_deliveries(&exact.parse_str(log)?.trial, 0.0).is_empty());

    let tolerant = LogParser::with_config(ParserConfig::new().with_match_tolerance(0.1));
    let parsed = tolerant.parse_str(log)?;
    let deliveries =
        metrics::pair_deliveries(&parsed.trial, tolerant.config().match_tolerance);
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].latency_secs, 2.0);

    Ok(())
}
