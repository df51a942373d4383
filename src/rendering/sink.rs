/// Consumers of render instructions

use crate::rendering::RenderInstruction;
use crate::Result;

/// Anything that can place a marker: the outbound seam towards a map widget.
///
/// The renderer only promises "place a marker at this position, with this
/// optional class, showing this popup". Implementations decide what that
/// means (collect, serialize, emit a page).
pub trait MarkerSink {
    fn place_marker(&mut self, instruction: &RenderInstruction) -> Result<()>;
}

/// Collecting sink
impl MarkerSink for Vec<RenderInstruction> {
    fn place_marker(&mut self, instruction: &RenderInstruction) -> Result<()> {
        self.push(instruction.clone());
        Ok(())
    }
}

impl<S: MarkerSink + ?Sized> MarkerSink for &mut S {
    fn place_marker(&mut self, instruction: &RenderInstruction) -> Result<()> {
        (**self).place_marker(instruction)
    }
}
