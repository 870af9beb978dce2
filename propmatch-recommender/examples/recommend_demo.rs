//! Rank a handful of listings against one buyer's preferences

use propmatch_recommender::{Property, PropertyRecommender, PropertyTable, Result, UserPreferences};

fn main() -> Result<()> {
    let table = PropertyTable::new(vec![
        Property::new(420_000.0, 95.0, 3.0, 9.0, 6.0).with_attribute("district", "Kreuzberg"),
        Property::new(890_000.0, 180.0, 5.0, 4.0, 9.0).with_attribute("district", "Zehlendorf"),
        Property::new(210_000.0, 48.0, 1.0, 8.0, 5.0).with_attribute("district", "Wedding"),
        Property::new(460_000.0, 110.0, 3.0, 7.0, 8.0).with_attribute("district", "Pankow"),
        Property::new(650_000.0, 90.0, 2.0, 10.0, 7.0).with_attribute("district", "Mitte"),
    ]);

    let prefs = UserPreferences::new(450_000.0, 100.0, 3.0, 8.0, 8.0)?;
    let recommender = PropertyRecommender::new(table);

    println!("=== Recommendations ===\n");
    for rec in recommender.recommend_scored(&prefs, 3)? {
        println!(
            "  {}. {} (row {}): similarity {:.3}, price {:.0}",
            rec.rank,
            rec.property.attributes["district"].as_str().unwrap_or("?"),
            rec.index,
            rec.score,
            rec.property.price
        );
    }

    Ok(())
}
