//! Fixed coefficient matrices of the L0 finite-size expansion.
//!
//! Row `i` of each table holds the six coefficients of a degree-6 polynomial in `αZ`
//! (without constant term) that yields the expansion coefficient `a_i` of the L0 correction.
//! The electron table applies to beta-minus decay, the positron table to beta-plus decay.

use crate::core::constants::FINE_STRUCTURE_CONSTANT;

pub const EXPANSION_ROWS: usize = 7;
pub const EXPANSION_POWERS: usize = 6;

pub type ExpansionTable = [[f64; EXPANSION_POWERS]; EXPANSION_ROWS];

pub const L0_ELECTRON: ExpansionTable = [
    [0.115, -1.8123, 8.2498, -11.223, -14.854, 32.086],
    [-0.00062, 0.007165, 0.01841, -0.53736, 1.2691, -1.5467],
    [0.02482, -0.5975, 4.84199, -15.3374, 23.9774, -12.6534],
    [-0.14038, 3.64953, -38.8143, 172.1368, -346.708, 288.7873],
    [0.008152, -1.15664, 49.9663, -273.711, 657.6292, -603.7033],
    [1.2145, -23.9931, 149.9718, -471.2985, 662.1909, -305.6804],
    [-1.5632, 33.4192, -255.1333, 938.5297, -1641.2845, 1095.358],
];

pub const L0_POSITRON: ExpansionTable = [
    [0.0701, -2.572, 27.5971, -128.658, 272.264, -214.925],
    [-0.002308, 0.066463, -0.6407, 2.63606, -5.6317, 4.0011],
    [0.07936, -2.09284, 18.45462, -80.9375, 160.8384, -124.8927],
    [-0.93832, 22.02513, -197.00221, 807.1878, -1566.6077, 1156.3287],
    [4.276181, -96.82411, 835.26505, -3355.8441, 6411.3255, -4681.573],
    [-8.2135, 179.0862, -1492.1295, 5872.5362, -11038.7299, 7963.4701],
    [5.4583, -115.8922, 940.8305, -3633.9181, 6727.6296, -4795.0481],
];

/// Evaluates `a_i = Σ_j table[i][j] · (αZ)^(j+1)` for every row of `table`.
pub fn expansion_coefficients(table: &ExpansionTable, z: u32) -> [f64; EXPANSION_ROWS] {
    let alpha_z = FINE_STRUCTURE_CONSTANT * f64::from(z);
    let mut coefficients = [0.0; EXPANSION_ROWS];
    for (coefficient, row) in coefficients.iter_mut().zip(table.iter()) {
        let mut power = alpha_z;
        for &b in row {
            *coefficient += b * power;
            power *= alpha_z;
        }
    }
    coefficients
}
