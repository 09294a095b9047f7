/// Metropolis acceptance probability for an energy change at a temperature
///
/// Improvements (`delta < 0`) are always accepted. Otherwise the probability
/// is `exp(-delta / temperature)`; once the temperature has cooled to zero
/// only moves that leave the energy unchanged are still accepted.
pub fn metropolis_acceptance(delta: f64, temperature: f64) -> f64 {
    if delta < 0.0 {
        return 1.0;
    }
    if temperature <= 0.0 {
        return if delta <= 0.0 { 1.0 } else { 0.0 };
    }

    (-delta / temperature).exp()
}
