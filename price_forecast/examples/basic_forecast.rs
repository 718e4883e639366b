use chrono::NaiveDate;
use price_forecast::models::{ForecastModel, SeasonalTrendModel, TrainedForecastModel};
use price_forecast::utils::generate_price_series;
use price_forecast::{PredictRequest, PredictResponse, PriceTable};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Price Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    // Two years of synthetic daily prices for one market
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).ok_or("invalid start date")?;
    let observations =
        generate_price_series("Sugarcane", "DistrictA", start, 730, 2000.0, 0.4, 15.0, 42)?;
    let table = PriceTable::from_observations(observations);
    println!("Loaded {} observations\n", table.len());

    // Train once, forecast several dates
    let series = table.series("Sugarcane", "DistrictA")?;
    let model = SeasonalTrendModel::default();
    let trained = model.train(&series)?;
    println!("{} slope: {:.4} per day\n", trained.name(), trained.slope());

    for target in ["2025-01-05", "2025-02-01"] {
        let date = NaiveDate::parse_from_str(target, "%Y-%m-%d")?;
        let result = trained.forecast(date)?;

        println!("Forecast for {}: {:.2}", target, result.predicted_price());
        for point in result.window() {
            println!("  {}  {:>10.2}", point.date, point.predicted);
        }
        println!("  best day to sell: {}\n", result.recommended_date());
    }

    // The same query through the request contract
    let request = PredictRequest::new("sugarcane", "districta", "05/01/2025");
    let response = price_forecast::predict(&table, &request)?;
    println!("JSON response:");
    println!("{}", serde_json::to_string_pretty::<PredictResponse>(&response)?);

    Ok(())
}
