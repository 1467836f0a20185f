//! Checks over the structured event stream, aggregated with polars
#![cfg(feature = "instrument")]

use market_core::instrument;
use market_core::{ROUNDS, Scenario};
use polars::prelude::*;

#[test]
fn tool_output_averages_half_capacity() {
    let ((), recorder) = instrument::capture(|| {
        let mut world = Scenario::Labor.build(31).unwrap();
        world.run(4_000);
    });

    let frames = recorder.to_dataframes().unwrap();
    let mean = frames["produce"]
        .clone()
        .lazy()
        .filter(col("producer").eq(lit("ToolMakers")))
        .select([col("quantity").cast(DataType::Float64).mean()])
        .collect()
        .unwrap();
    let mean = mean
        .column("quantity")
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .get(0)
        .unwrap();

    assert!((mean - 5.0).abs() < 0.25, "mean tool output {mean}");
}

#[test]
fn repeated_stake_doubles_dividend_rows() {
    let ((), recorder) = instrument::capture(|| {
        let mut world = Scenario::Investment.build(6).unwrap();
        world.run(ROUNDS);
    });

    assert_eq!(recorder.count("invest"), 2);
    assert_eq!(recorder.count("round"), ROUNDS as usize);

    let per_round = recorder
        .to_dataframes()
        .unwrap()
        .remove("dividend")
        .unwrap()
        .lazy()
        .group_by([col("round")])
        .agg([col("actor").count().cast(DataType::UInt64).alias("payments")])
        .sort(["round"], Default::default())
        .collect()
        .unwrap();

    let rounds: Vec<u64> = per_round
        .column("round")
        .unwrap()
        .as_materialized_series()
        .u64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    let payments: Vec<u64> = per_round
        .column("payments")
        .unwrap()
        .as_materialized_series()
        .u64()
        .unwrap()
        .into_no_null_iter()
        .collect();

    // Bob's first stake lands in round 5, the second in round 10
    assert_eq!(rounds, vec![5, 6, 7, 8, 9, 10]);
    assert_eq!(payments, vec![1, 1, 1, 1, 1, 2]);
}

#[test]
fn price_rows_carry_supply() {
    let ((), recorder) = instrument::capture(|| {
        let mut world = Scenario::Investment.build(2).unwrap();
        world.run(ROUNDS);
    });

    let price = recorder.table("price").unwrap();
    assert_eq!(price.rows(), 2 * ROUNDS as usize);
    let prices = price.column("price").unwrap().as_f64().unwrap();
    assert!(prices.iter().all(|p| *p >= 1.0));
    assert!(price.column("supply").unwrap().as_u64().is_some());
}
