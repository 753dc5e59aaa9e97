//! Converting local-time AWS cron expressions to UTC.

use local_crontab::{Converter, ShiftPolicy};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let converter = Converter::default();

    // Fixed offset: one expression in, one out
    for utc in converter.convert("0 9 * * ? *", "America/Bogota")? {
        println!("0 9 * * ? * (America/Bogota)  →  {utc}");
    }

    // Daylight saving splits the year
    println!();
    for utc in converter.convert("0 9 ? * MON-FRI *", "Europe/Paris")? {
        println!("0 9 ? * MON-FRI * (Europe/Paris)  →  {utc}");
    }

    // Near midnight the raw shift leaves the hour domain unless wrapped
    println!();
    let expr = "0 2 1 1 ? *";
    println!("preserve: {:?}", converter.convert(expr, "Asia/Kolkata")?);
    let wrapping = converter.with_policy(ShiftPolicy::Wrap);
    println!("wrap:     {:?}", wrapping.convert(expr, "Asia/Kolkata")?);

    // Errors render with the offending field underlined
    println!();
    if let Err(e) = Converter::default().convert("0 9 32 * ? *", "UTC") {
        println!("{}", e.display_rich());
    }

    Ok(())
}
