//! Scenarios command implementation

use pricer_validation::ScenarioId;

use crate::Result;

/// Print the preset table to stdout
pub fn run() -> Result<()> {
    print!("{}", listing()?);
    Ok(())
}

fn listing() -> Result<String> {
    let mut out = format!(
        "{:<3} {:<22} {:>6} {:>9} {:>19}\n",
        "ID", "SLUG", "VOL", "EXPIRY", "SWEEP"
    );
    for id in ScenarioId::ALL {
        let scenario = id.scenario()?;
        let base = scenario.base();
        let sweep = scenario.sweep();
        out.push_str(&format!(
            "{:<3} {:<22} {:>6.2} {:>9.6} {:>8} .. {:<6} ({} points)\n    {}\n",
            id.number(),
            id.slug(),
            base.volatility(),
            base.expiry(),
            sweep.min(),
            sweep.max(),
            sweep.points(),
            id.description(),
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_contains_every_preset() {
        let text = listing().unwrap();
        for id in ScenarioId::ALL {
            assert!(text.contains(id.slug()));
            assert!(text.contains(id.description()));
        }
    }
}
