pub mod ethers_backend;
pub mod evaluator;
pub mod points;

pub const ERC20_POINTS_CONTRACT: &str = "ERC20Points";
pub const EVALUATOR_CONTRACT: &str = "Evaluator";
pub const EVALUATOR_2_CONTRACT: &str = "Evaluator2";
