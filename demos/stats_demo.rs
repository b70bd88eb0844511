use clap::Parser;
use clap::ValueEnum;
use ident_hash::Config;
use ident_hash::IdentityHashMap;
use ident_hash::InsertPolicy;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    Linear,
    RobinHood,
    Both,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: usize,

    #[arg(short = 'p', long = "policy", value_enum, default_value_t = Policy::Both)]
    policy: Policy,

    /// Remove this percentage of the entries, in random order, before printing.
    #[arg(short = 'r', long = "remove_percent", default_value_t = 0)]
    remove_percent: usize,

    #[arg(short = 's', long = "seed", default_value_t = 0x5eed)]
    seed: u64,
}

fn run(args: &Args, objects: &[Box<u64>], policy: InsertPolicy) {
    println!("--- {policy:?} ---");

    let config = Config::new().with_policy(policy);
    let mut map = IdentityHashMap::with_config(config);
    for (i, object) in objects.iter().enumerate() {
        map.insert(&**object, i);
    }

    println!("Inserted {} entries into {} slots", map.len(), map.capacity());

    if args.remove_percent > 0 {
        let mut order: Vec<&u64> = objects.iter().map(|object| &**object).collect();
        order.shuffle(&mut SmallRng::seed_from_u64(args.seed ^ 0xdead));

        let count = objects.len() * args.remove_percent.min(100) / 100;
        for object in order.into_iter().take(count) {
            map.remove(&object);
        }
        println!("Removed {count} entries, {} remain", map.len());
    }

    map.debug_stats().print();
}

fn main() {
    let args = Args::parse();

    // Distinct allocations holding equal values: only their addresses tell them apart.
    let objects: Vec<Box<u64>> = (0..args.entries).map(|_| Box::new(42)).collect();

    match args.policy {
        Policy::Linear => run(&args, &objects, InsertPolicy::Linear),
        Policy::RobinHood => run(&args, &objects, InsertPolicy::RobinHood),
        Policy::Both => {
            run(&args, &objects, InsertPolicy::Linear);
            run(&args, &objects, InsertPolicy::RobinHood);
        }
    }
}
