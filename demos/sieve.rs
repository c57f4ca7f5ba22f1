use grow_bitset::BitSet;

/// Marks composites in a bitset that grows as the sieve walks past its end.
fn sieve(limit: usize) -> BitSet {
    let mut composite = BitSet::with_capacity(8, false);
    composite.set(0).set(1);
    for n in 2..=limit {
        if composite.is_set(n) {
            continue;
        }
        let mut multiple = n * n;
        while multiple <= limit {
            composite.set(multiple);
            multiple += n;
        }
    }
    composite
}

fn main() {
    const LIMIT: usize = 100;
    let composite = sieve(LIMIT);
    let primes = composite.complement();

    let listed: Vec<usize> = primes.each_set_bit().take_while(|n| *n <= LIMIT).collect();
    println!("primes up to {LIMIT}: {listed:?}");
    println!("{}", primes.to_ascii(32, 0));
}
