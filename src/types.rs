/// Position of an item in the sample pool.
/// Example: `17`
pub type SampleIndex = usize;
/// Binary class label attached to every pool item.
/// Examples: `0` (irrelevant), `1` (relevant)
pub type Label = u8;
/// Name of the query strategy that selected a training index.
/// Examples: `max`, `random`, `uncertainty`
pub type QuerySource = String;
/// Tuner-facing hyperparameter name.
/// Examples: `bal_rand_max_b`, `one_zero_delta`
pub type ParamName = String;
