use std::rc::Rc;

use clap::{App, load_yaml};

use maplabel::engine::Engine;
use maplabel::util::{read_params, export_results};

/** places the labels of an instance: reduce, FALP greedy, then the
ejection chain local search */
pub fn main() {
    env_logger::init();
    // parse arguments
    let yaml = load_yaml!("chain_search.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    let (_inst_filename, instance, sol_file) = read_params(main_args);

    // solve it
    let engine = Rc::new(Engine::with_default_oracle());
    let mut problem = instance.build_problem(engine, false)
        .expect("instance candidates and counts disagree");
    problem.reduce();
    problem.chain_search();

    // export results
    let mut unlabeled = Vec::new();
    let placements = problem.get_solution(false, Some(&mut unlabeled));
    export_results(&instance, &placements, &unlabeled, sol_file);
}
