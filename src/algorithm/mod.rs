/// Adjacency engine reducing exhaustive border scores to a top-K table
pub mod adjacency;
/// Simulated annealing solver
pub mod annealing;
/// Bitset of tiles already placed
pub mod bitset;
/// Cooperative cancellation flag
pub mod cancel;
/// Grid energy used by the annealing solver
pub mod energy;
/// Greedy row-major placement solver
pub mod greedy;
/// Dense score index and the compatibility lookup seam
pub mod index;
/// Rotation choice strategies for greedy placement
pub mod rotation;
/// Multi-modal border compatibility scorer
pub mod scorer;
/// Ranked top-K adjacency table
pub mod table;
