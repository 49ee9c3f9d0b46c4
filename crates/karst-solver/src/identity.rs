// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The identity adjuster.
//!
//! Returns propagated positions unchanged. Useful as a default, as a
//! baseline in comparisons, and for hosts that explicitly want raw
//! propagation output.

use crate::adjuster::{StationPositions, SurveyAdjuster};
use karst_model::diag::Diagnostics;
use karst_net::network::SurveyNetwork;

/// An adjuster that performs no adjustment.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityAdjuster;

impl SurveyAdjuster for IdentityAdjuster {
    fn name(&self) -> &str {
        "IdentityAdjuster"
    }

    fn adjust(&self, network: &SurveyNetwork, _diag: &mut Diagnostics) -> StationPositions {
        network.positions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use karst_core::math::vec3::{Vector3D, ZERO};
    use karst_model::survey::ShotFlags;
    use karst_net::network::NetworkBuilder;
    use karst_net::propagate::propagate;

    #[test]
    fn test_identity_returns_propagation() {
        let mut builder = NetworkBuilder::new();
        let a = builder.intern("A");
        let b = builder.intern("B");
        builder.add_shot(a, b, Vector3D::new(1.0, 2.0, 3.0), 4.0, ShotFlags::default());
        builder.set_fixed(a, ZERO);
        let mut network = builder.build();

        let mut diag = Diagnostics::new();
        propagate(&mut network, &mut diag);

        let adjusted = IdentityAdjuster.adjust(&network, &mut diag);
        assert_eq!(adjusted, network.positions());
        assert_eq!(adjusted["B"], Vector3D::new(1.0, 2.0, 3.0));
    }
}
