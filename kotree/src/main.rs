//! Compile rewrite rules to match trees and evaluate terms.

use clap::Parser;
use kotree::{process, Error, Opt};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env("LOG").init();

    let opt = Opt::parse();

    // if a precise number of parallel jobs has been given
    if let Some(Some(jobs)) = opt.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()?;
    }

    let reports: Vec<_> = if opt.jobs.is_some() {
        opt.files.par_iter().map(|f| process(f, &opt)).collect()
    } else {
        opt.files.iter().map(|f| process(f, &opt)).collect()
    };

    // print reports in the order of the files, stopping at the first error
    for report in reports {
        print!("{}", report?)
    }
    Ok(())
}
