use super::entity::Param;

/// Reorders `params` into three contiguous groups:
/// 1. included, not corners
/// 2. included, corners
/// 3. not included
///
/// Both passes are stable sorts, so declaration order survives inside each
/// group. Returns the sizes of groups 1 and 2.
pub fn partition(params: &mut [Param]) -> (usize, usize) {
    params.sort_by_key(|p| !p.include);
    params.sort_by_key(|p| !(p.include && !p.corners));

    let num_params = params.iter().filter(|p| p.include && !p.corners).count();
    let num_params_corn = params.iter().filter(|p| p.is_corner()).count();
    (num_params, num_params_corn)
}
