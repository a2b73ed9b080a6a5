mod component;
mod instantiate;
mod resolve;
mod validate;

use alloc::collections::BTreeSet;
use core::fmt::{self, Display, Formatter};

pub use component::{BindErrorKind, ComponentErrorKind};
pub use instantiate::InstantiateErrorKind;
pub use resolve::ResolveErrorKind;
pub use validate::ValidateErrorKind;

use crate::key::ComponentKey;

pub(crate) struct KeyList<'a>(pub(crate) &'a BTreeSet<ComponentKey>);

impl Display for KeyList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, key) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}
