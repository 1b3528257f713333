use durafmt::{format_time, format_time_str, DurationFormatter, Mode, TimeUnit};
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=durafmt=trace shows rejected requests and each breakdown
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Automatic breakdown, up to three units
    println!(
        "90 minutes: {}",
        format_time(90.0, Mode::Default, None, TimeUnit::Minute)
    );
    println!(
        "90000 minutes: {}",
        format_time(90_000.0, Mode::Default, None, TimeUnit::Minute)
    );

    // Fixed unit counts
    for n in [1, 2, 5] {
        if let Some(mode) = Mode::count(n) {
            println!(
                "{} unit(s): {}",
                n,
                format_time(90_061_001.0, mode, None, TimeUnit::Millisecond)
            );
        }
    }

    // Forced output unit
    let seconds = DurationFormatter::new().output_unit(TimeUnit::Second);
    println!("2500ms in s: {}", seconds.format(2_500.0));
    println!("499ms in s: {}", seconds.format(499.0));

    // Precise mode keeps fractions
    let precise = seconds.mode(Mode::Precise);
    println!("1500ms precise: {}", precise.format(1_500.0));
    println!(
        "0s precise: {}",
        format_time(0.0, Mode::Precise, None, TimeUnit::Second)
    );

    // Non-positive durations
    println!(
        "-3h: {}",
        format_time(-3.0, Mode::Default, None, TimeUnit::Hour)
    );

    // String boundary and the no-data sentinel
    println!(
        "\"precise\" 1500000ns in ms: {}",
        format_time_str(1_500_000.0, Some("precise"), Some("ms"), Some("ns"))
    );
    println!(
        "unknown unit: {}",
        format_time_str(10.0, None, None, Some("fortnight"))
    );
    println!(
        "bad mode: {}",
        format_time_str(10.0, Some("lots"), None, None)
    );
}
