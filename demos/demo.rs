use datetime_nano::{CalendarUtc, TimestampNano};

fn main() -> Result<(), datetime_nano::Error> {
    // Feed timestamps arrive as nanoseconds since epoch
    let ts = TimestampNano::new(1_739_219_232_123_456_789);
    println!("Timestamp: {}", ts);
    println!("Calendar view: {}", ts.to_calendar_utc());
    println!("Date: {}", ts.date());
    println!("Sub-tick nanoseconds: {}", ts.nanoseconds());
    println!("Sub-second nanoseconds: {}", ts.subsec_nanos());
    println!("Ticks since 0001-01-01: {}", ts.total_ticks());

    // Parsing accepts 0 to 9 fractional digits
    for text in [
        "2025-02-10 20:27:12.123456789",
        "2025-02-10T20:27:12.123",
        "2025-02-10 20:27:12",
    ] {
        println!("{:<32} -> {}", text, TimestampNano::parse(text)?);
    }
    match TimestampNano::parse("2025-02-30 00:00:00") {
        Ok(ts) => println!("Unexpectedly parsed {}", ts),
        Err(err) => println!("Rejected: {}", err),
    }

    // Arithmetic
    println!("+1 day: {}", ts.add_days(1));
    println!("-90 minutes: {}", ts.add_minutes(-90));
    println!("+1 month: {}", ts.add_months(1)?);
    println!("Wrapped below epoch: {}", TimestampNano::new(5).add_nanoseconds(-10));
    println!("Checked below epoch: {:?}", TimestampNano::new(5).checked_add_nanoseconds(-10));

    // Calendar construction
    let instant = CalendarUtc::new(2025, 2, 10, 20, 27, 12, 123)?;
    println!("From calendar: {}", TimestampNano::from_calendar_utc(instant)?);
    println!("Now (UTC): {}", TimestampNano::now());
    Ok(())
}
