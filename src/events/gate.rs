/*!
 * Blocking Gate
 * Decides whether an event instance must wait for its blocks to end
 */

use super::traits::BlockStack;
use super::types::Event;

/// Whether any live block, or the global suppression set, blocks `instance`
///
/// Walks innermost to outermost and checks the global set last.
pub fn is_blocked<B>(blocks: &B, instance: &Event) -> bool
where
    B: BlockStack + ?Sized,
{
    let kind = instance.kind();
    (0..blocks.block_count()).any(|depth| blocks.block_suppression(depth).blocks(kind))
        || blocks.global_suppression().blocks(kind)
}
