use clap::Parser;
use probe_table::Table;
use probe_table::anagram::group_anagrams;
use probe_table::permutation::is_palindrome_permutation;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 8)]
    capacity: usize,

    /// Words to group into anagram clusters.
    #[arg(long = "words", num_args = 1.., default_values_t = [
        "east".to_string(), "cars".to_string(), "acre".to_string(), "arcs".to_string(),
        "teas".to_string(), "eats".to_string(), "race".to_string(),
    ])]
    words: Vec<String>,
}

const ROSTER: &[(&str, &str)] = &[
    ("Hobbit", "Bilbo"),
    ("Hobbit", "Frodo"),
    ("Wizard", "Gandalf"),
    ("Human", "Aragorn"),
    ("Elf", "Legolas"),
    ("Maiar", "The Necromancer"),
    ("Maiar", "Sauron"),
    ("RingBearer", "Gollum"),
    ("LadyOfLight", "Galadriel"),
    ("HalfElven", "Arwen"),
    ("Ent", "Treebeard"),
];

fn main() {
    let args = Args::parse();

    println!("Creating Table with capacity: {}", args.capacity);
    let mut lore: Table<&str> = Table::with_capacity(args.capacity);

    for &(race, name) in ROSTER {
        let before = lore.capacity();
        if let Some(previous) = lore.set(race, name) {
            println!("{race}: {previous} -> {name}");
        }
        if lore.capacity() != before {
            println!("grew {} -> {} slots at {race}", before, lore.capacity());
        }
    }

    for race in ["Hobbit", "Maiar", "Dwarf"] {
        match lore.get(race) {
            Ok(name) => println!("{race} is {name}"),
            Err(err) => println!("{err}"),
        }
    }

    let gone = lore.remove("RingBearer").map(|name| name.to_string());
    println!("removed RingBearer: {gone:?}");
    println!(
        "RingBearer still present: {}",
        lore.contains_key("RingBearer")
    );

    println!(
        "Final load factor: {:.2}% ({} entries, {} tombstones)",
        lore.load_ratio() * 100.0,
        lore.len(),
        lore.deleted_count()
    );
    lore.probe_histogram().print();
    lore.debug_stats().print();

    println!("Anagram groups: {:?}", group_anagrams(&args.words));
    for word in ["tacocat", "hobbit"] {
        println!(
            "{word} is a palindrome permutation: {}",
            is_palindrome_permutation(word)
        );
    }
}
