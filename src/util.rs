use clap::ArgMatches;

use crate::instance::LabelInstance;
use crate::label_position::LabelPosition;

/** reads command line input and returns the instance name, the instance
and the optional solution filename */
pub fn read_params(main_args:ArgMatches) -> (String, LabelInstance, Option<String>) {
    let inst_filename = main_args.value_of("instance").unwrap();
    // read value of the solution filename
    let sol_file: Option<String> = match main_args.value_of("solution") {
        None => None,
        Some(e) => {
            println!("printing solutions in: {}", e);
            Some(e.to_string())
        }
    };
    // read instance file
    let instance = LabelInstance::from_file(inst_filename);
    instance.display_statistics();
    println!("=======================");
    (inst_filename.to_string(), instance, sol_file)
}

/// prints the outcome of a solve and optionally exports the placements
pub fn export_results(
    instance:&LabelInstance,
    placements:&[&LabelPosition],
    unlabeled:&[&LabelPosition],
    sol_file:Option<String>,
) {
    let total:f64 = placements.iter().map(|lp| lp.cost()).sum();
    println!("{} placed labels ({} unlabeled features)", placements.len(), unlabeled.len());
    println!("total placement cost: {:.4}", total);
    match sol_file {
        None => {},
        Some(filename) => instance.write_solution(filename.as_str(), placements),
    }
}
