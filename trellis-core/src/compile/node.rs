//! Render descriptions.

use crate::params::Param;

/// A static description of content, generic over the medium's atom type `A`.
///
/// Nodes reference values through Params only, so one description can be
/// compiled against any number of states.
#[derive(Debug, Clone)]
pub enum Node<A> {
    /// One unit whose value follows a Param.
    Atom(Param<A>),

    /// A nested Range, optionally opened by a header unit.
    Block {
        head: Option<A>,
        children: Vec<Node<A>>,
    },

    /// One of two subtrees, chosen by a condition. Switching branches
    /// re-renders the slot.
    When {
        condition: Param<bool>,
        then: Box<Node<A>>,
        otherwise: Box<Node<A>>,
    },

    /// One unit per item. Any change to the list re-renders all of it.
    List(Param<Vec<A>>),
}

impl<A> Node<A>
where
    A: Clone + 'static,
{
    pub fn atom(param: Param<A>) -> Self {
        Node::Atom(param)
    }

    /// An atom that never changes.
    pub fn value(value: A) -> Self {
        Node::Atom(Param::constant(value))
    }

    pub fn block(children: Vec<Node<A>>) -> Self {
        Node::Block {
            head: None,
            children,
        }
    }

    pub fn block_with_head(head: A, children: Vec<Node<A>>) -> Self {
        Node::Block {
            head: Some(head),
            children,
        }
    }

    pub fn when(condition: Param<bool>, then: Node<A>, otherwise: Node<A>) -> Self {
        Node::When {
            condition,
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn list(items: Param<Vec<A>>) -> Self {
        Node::List(items)
    }

    /// An empty block, useful as the missing branch of `when`.
    pub fn empty() -> Self {
        Self::block(Vec::new())
    }

    /// Dynamic keys referenced anywhere in this tree, in first-seen order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys(&self, keys: &mut Vec<String>) {
        let mut push = |key: Option<&str>| {
            if let Some(key) = key {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.to_string());
                }
            }
        };
        match self {
            Node::Atom(param) => push(param.key()),
            Node::List(param) => push(param.key()),
            Node::When {
                condition,
                then,
                otherwise,
            } => {
                push(condition.key());
                then.collect_keys(keys);
                otherwise.collect_keys(keys);
            }
            Node::Block { children, .. } => {
                for child in children {
                    child.collect_keys(keys);
                }
            }
        }
    }
}
