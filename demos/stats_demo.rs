use clap::Parser;
use quad_hash::DefaultOps;
use quad_hash::HashSet;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: u64,

    /// Percentage of the inserted values to erase afterwards.
    #[arg(short = 'e', long = "erase_percent", default_value_t = 75)]
    erase_percent: u64,
}

fn print_histogram(set: &HashSet<u64, DefaultOps>) {
    let hist = set.probe_histogram();
    let max = hist.iter().copied().max().unwrap_or(0);
    if max == 0 {
        println!("probe histogram: empty");
        return;
    }

    println!("probe histogram ({} values):", set.len());
    for (attempt, count) in hist.iter().enumerate() {
        let width = (count * 60).div_ceil(max);
        println!("{attempt:>4} | {:<60} {count}", "█".repeat(width));
    }
}

fn main() {
    let args = Args::parse();

    let mut set: HashSet<u64, DefaultOps> = HashSet::new();
    println!("Initial capacity: {}", set.capacity());
    println!("Inserting {} values...", args.count);

    let mut resizes = 0;
    for value in 0..args.count {
        let capacity = set.capacity();
        set.insert(&value);
        if set.capacity() != capacity {
            resizes += 1;
        }
    }

    println!("Grew {} times to capacity {}", resizes, set.capacity());
    set.debug_stats().print();
    print_histogram(&set);

    let to_erase = args.count * args.erase_percent.min(100) / 100;
    println!("Erasing {} values...", to_erase);

    let mut shrinks = 0;
    for value in 0..to_erase {
        let capacity = set.capacity();
        set.erase(&value);
        if set.capacity() != capacity {
            shrinks += 1;
        }
    }

    println!("Shrank {} times to capacity {}", shrinks, set.capacity());
    set.debug_stats().print();
    print_histogram(&set);
}
