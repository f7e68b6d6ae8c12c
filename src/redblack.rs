//! A Red-Black Tree over unique `i32` keys. Nodes own their children and keep a non-owning
//! pointer to their parent so that the insertion fix-up can walk back up the tree.
//!
//! # Examples
//!
//! ```
//! use rbtree::redblack::Tree;
//! use rbtree::Error;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(1));
//! assert_eq!(tree.min(), Err(Error::EmptyTree));
//!
//! tree.insert(1).unwrap();
//! assert!(tree.contains(1));
//!
//! // Keys are unique.
//! assert_eq!(tree.insert(1), Err(Error::DuplicateKey(1)));
//! assert_eq!(tree.len(), 1);
//!
//! // Copies share nothing with the original.
//! let copy = tree.clone();
//! tree.insert(2).unwrap();
//! assert!(!copy.contains(2));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::ptr::NonNull;

use crate::Error;

/// A self-balancing Binary Search Tree (specifically, a Red-Black Tree). This can be used for
/// inserting and finding unique integer keys.
pub struct Tree {
    // This is a `Link` instead of an `Option<Box<Node>>` so that it can be moved around with the
    // `Tree` without the children's parent pointers breaking.
    root: Link,
    len: usize,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Tree {
    fn drop(&mut self) {
        if let Some(root) = self.root.take().0 {
            // SAFETY: We own the root we're dropping so this won't be called twice. The root was
            // initially allocated using `Box::new` (in `Node::new_boxed`) so this should be well
            // aligned, etc.
            unsafe { drop(Box::from_raw(root.as_ptr())) };
        }
    }
}

impl Clone for Tree {
    /// Deep copies every node. The parent pointers of the copy point into the copy.
    fn clone(&self) -> Self {
        Self {
            root: Link(self.root().map(Node::leak_clone)),
            len: self.len,
        }
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("root", &self.root())
            .finish()
    }
}

impl From<i32> for Tree {
    fn from(key: i32) -> Self {
        Self::with_key(key)
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = i32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl Tree {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: Link(None),
            len: 0,
        }
    }

    /// Generate a `Tree` holding just `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::redblack::Tree;
    ///
    /// let tree = Tree::with_key(15);
    ///
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(tree.to_prefix_string(), " B15 ");
    /// ```
    pub fn with_key(key: i32) -> Self {
        Self {
            root: Link::from_box(Node::new_boxed(key, Color::Black)),
            len: 1,
        }
    }

    /// The number of keys stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no keys.
    pub fn is_empty(&self) -> bool {
        self.root.0.is_none()
    }

    /// Whether `key` has been inserted into the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::redblack::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1).unwrap();
    ///
    /// assert!(tree.contains(1));
    /// assert!(!tree.contains(42));
    /// ```
    pub fn contains(&self, key: i32) -> bool {
        self.get(key).is_some()
    }

    /// The smallest key in the tree.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`] if nothing has been inserted.
    pub fn min(&self) -> Result<i32, Error> {
        let mut node = self.root().ok_or(Error::EmptyTree)?;
        while let Some(left) = node.left() {
            node = left;
        }
        Ok(node.key)
    }

    /// The largest key in the tree.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`] if nothing has been inserted.
    pub fn max(&self) -> Result<i32, Error> {
        let mut node = self.root().ok_or(Error::EmptyTree)?;
        while let Some(right) = node.right() {
            node = right;
        }
        Ok(node.key)
    }

    /// Inserts `key` into the tree, recoloring and rotating nodes as needed to keep it balanced.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKey`] if `key` is already in the tree. The tree is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::redblack::Tree;
    /// use rbtree::Error;
    ///
    /// let mut tree = Tree::new();
    ///
    /// tree.insert(30).unwrap();
    /// tree.insert(45).unwrap();
    /// tree.insert(40).unwrap();
    /// assert_eq!(tree.to_prefix_string(), " B40  R30  R45 ");
    ///
    /// assert_eq!(tree.insert(45), Err(Error::DuplicateKey(45)));
    /// ```
    pub fn insert(&mut self, key: i32) -> Result<(), Error> {
        if self.contains(key) {
            log::debug!("rejecting duplicate key {key}");
            return Err(Error::DuplicateKey(key));
        }

        if self.root.0.is_none() {
            self.root = Link::from_box(Node::new_boxed(key, Color::Black));
            self.len = 1;
            return Ok(());
        }

        let node = NonNull::from(Box::leak(Node::new_boxed(key, Color::Red)));
        self.attach(node);

        // SAFETY: `node` was just linked into this tree and nothing else references it.
        if unsafe { node.as_ref() }.parent.color() == Color::Red {
            self.fix_insert(node);
        }

        if let Some(root) = self.root_mut() {
            root.color = Color::Black;
        }
        self.len += 1;

        if cfg!(debug_assertions) {
            let root = self.root().expect("Inserting implies a root");
            assert_eq!(root.color, Color::Black);
            assert!(root.parent.0.is_none());

            // SAFETY: The fix-up is done so no mutable access to `node` is live.
            let node = unsafe { node.as_ref() };
            if let Some(left) = node.left() {
                assert!(node.key > left.key);
            }
            if let Some(right) = node.right() {
                assert!(node.key < right.key);
            }
        }

        Ok(())
    }

    /// Renders the tree in-order. Every node renders as ` R<key> ` or ` B<key> `.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::redblack::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.to_infix_string(), "");
    ///
    /// tree.insert(30).unwrap();
    /// tree.insert(15).unwrap();
    /// assert_eq!(tree.to_infix_string(), " R15  B30 ");
    /// ```
    pub fn to_infix_string(&self) -> String {
        self.traversal(Order::Infix).to_string()
    }

    /// Renders the tree pre-order. See [`Tree::to_infix_string`] for the node format.
    pub fn to_prefix_string(&self) -> String {
        self.traversal(Order::Prefix).to_string()
    }

    /// Renders the tree post-order. See [`Tree::to_infix_string`] for the node format.
    pub fn to_postfix_string(&self) -> String {
        self.traversal(Order::Postfix).to_string()
    }

    /// Iterates over the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::redblack::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [5, 1, 4, 2, 3] {
    ///     tree.insert(key).unwrap();
    /// }
    ///
    /// assert_eq!(tree.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.push_left_spine(self.root());
        iter
    }

    fn traversal(&self, order: Order) -> Traversal<'_> {
        Traversal {
            root: self.root(),
            order,
        }
    }

    /// Finds the node holding `key`.
    fn get(&self, key: i32) -> Option<&Node> {
        let mut node = self.root();
        while let Some(n) = node {
            match key.cmp(&n.key) {
                Ordering::Less => node = n.left(),
                Ordering::Equal => return Some(n),
                Ordering::Greater => node = n.right(),
            }
        }
        None
    }

    fn root(&self) -> Option<&Node> {
        self.root.node()
    }

    fn root_mut(&mut self) -> Option<&mut Node> {
        self.root.node_mut()
    }

    /// Hangs `node` off the bottom of the tree where a plain BST insert would put it. No colors
    /// change. Equal keys go right, though `insert` never lets one get this far.
    fn attach(&mut self, node: NonNull<Node>) {
        // SAFETY: `node` was just leaked by the caller and isn't linked to anything yet.
        let key = unsafe { node.as_ref() }.key;

        let Some(mut parent) = self.root.0 else {
            self.root = Link(Some(node));
            return;
        };

        loop {
            // SAFETY: `parent` is a live node owned by this tree. The only reference made is to
            // one of its child links and it isn't held past the next iteration.
            let slot = unsafe {
                let parent = &mut *parent.as_ptr();
                if key < parent.key {
                    &mut parent.left
                } else {
                    &mut parent.right
                }
            };

            match slot.0 {
                Some(child) => parent = child,
                None => {
                    *slot = Link(Some(node));
                    // SAFETY: `node` is live and distinct from `parent`.
                    unsafe { (*node.as_ptr()).parent = Link(Some(parent)) };
                    return;
                }
            }
        }
    }

    /// Restores the "no red node has a red child" invariant after `node` (red) was attached under
    /// a red parent.
    ///
    /// With a red uncle, the parent and uncle turn black and the grandparent turns red. That can
    /// leave the grandparent in the same conflict with its own parent so we climb two levels and
    /// go again. With a black (or missing) uncle, one or two rotations around the grandparent
    /// settle it for good.
    ///
    /// The root may be left red; `insert` blackens it afterwards.
    fn fix_insert(&mut self, mut node: NonNull<Node>) {
        loop {
            // SAFETY (for every block in this loop): `node`, its parent, grandparent, and uncle
            // are live nodes owned by this tree. Colors and links are read and written through
            // raw pointers one field at a time so no references overlap.
            let parent = unsafe { node.as_ref() }
                .parent
                .0
                .expect("A red node with a red parent has a parent");
            let grandparent = unsafe { parent.as_ref() }.parent;
            let uncle = uncle(node);

            if uncle.color() == Color::Red {
                unsafe {
                    set_color(parent, Color::Black);
                    if let Some(uncle) = uncle.0 {
                        set_color(uncle, Color::Black);
                    }
                }

                let Some(grandparent) = grandparent.0 else {
                    return;
                };
                unsafe { set_color(grandparent, Color::Red) };
                log::trace!("red uncle: recolored under {}", unsafe {
                    grandparent.as_ref().key
                });

                if unsafe { grandparent.as_ref() }.parent.color() == Color::Red {
                    node = grandparent;
                    continue;
                }
                return;
            }

            let Some(grandparent) = grandparent.0 else {
                return;
            };
            unsafe { set_color(grandparent, Color::Red) };

            match (side(node), side(parent)) {
                (Some(Side::Left), Some(Side::Left)) => {
                    self.rotate_right(grandparent);
                    unsafe { set_color(parent, Color::Black) };
                }
                (Some(Side::Right), Some(Side::Right)) => {
                    self.rotate_left(grandparent);
                    unsafe { set_color(parent, Color::Black) };
                }
                (Some(Side::Left), Some(Side::Right)) => {
                    self.rotate_right(parent);
                    self.rotate_left(grandparent);
                    unsafe {
                        set_color(node, Color::Black);
                        set_color(parent, Color::Red);
                    }
                }
                (Some(Side::Right), Some(Side::Left)) => {
                    self.rotate_left(parent);
                    self.rotate_right(grandparent);
                    unsafe {
                        set_color(node, Color::Black);
                        set_color(parent, Color::Red);
                    }
                }
                (node_side, parent_side) => unreachable!(
                    "Fix-up reached an impossible shape: node is {node_side:?} of parent, parent \
                     is {parent_side:?} of grandparent"
                ),
            }
            return;
        }
    }

    /// Rotate `pivot` to the left. This moves its right child up vertically and `pivot` down
    /// vertically. Must only be called when there _is_ a right child.
    ///
    /// ## Panics
    ///
    /// When called on a node without a right child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///   Option<parent>             Option<parent>
    ///      /                          /
    ///   pivot                      new_top
    ///   /   \                      /     \
    ///  x   new_top   rotate ->   pivot    z
    ///       /  \                 /  \
    ///      y    z               x    y
    /// ```
    fn rotate_left(&mut self, pivot: NonNull<Node>) {
        // SAFETY: `pivot` and every node it links to are live nodes owned by this tree. All
        // access goes through raw place expressions so no two references overlap.
        unsafe {
            let old_top = pivot.as_ptr();
            let new_top = (*old_top).right.0.expect("Rotate left => right child");
            log::trace!(
                "rotating left around {}: {} moves up",
                (*old_top).key,
                (*new_top.as_ptr()).key
            );

            (*old_top).right = (*new_top.as_ptr()).left;
            if let Some(middle) = (*old_top).right.0 {
                (*middle.as_ptr()).parent = Link(Some(pivot));
            }

            (*new_top.as_ptr()).parent = (*old_top).parent;
            self.replace_child((*old_top).parent, pivot, new_top);

            (*new_top.as_ptr()).left = Link(Some(pivot));
            (*old_top).parent = Link(Some(new_top));
        }
    }

    /// Rotate `pivot` to the right. The mirror image of [`Tree::rotate_left`].
    ///
    /// ## Panics
    ///
    /// When called on a node without a left child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///      Option<parent>           Option<parent>
    ///        /                         /
    ///      pivot                    new_top
    ///      /    \                   /     \
    ///  new_top   z     rotate ->   x     pivot
    ///   / \                               /  \
    ///  x   y                             y    z
    /// ```
    fn rotate_right(&mut self, pivot: NonNull<Node>) {
        // SAFETY: See `rotate_left`.
        unsafe {
            let old_top = pivot.as_ptr();
            let new_top = (*old_top).left.0.expect("Rotate right => left child");
            log::trace!(
                "rotating right around {}: {} moves up",
                (*old_top).key,
                (*new_top.as_ptr()).key
            );

            (*old_top).left = (*new_top.as_ptr()).right;
            if let Some(middle) = (*old_top).left.0 {
                (*middle.as_ptr()).parent = Link(Some(pivot));
            }

            (*new_top.as_ptr()).parent = (*old_top).parent;
            self.replace_child((*old_top).parent, pivot, new_top);

            (*new_top.as_ptr()).right = Link(Some(pivot));
            (*old_top).parent = Link(Some(new_top));
        }
    }

    /// Points whichever link held `old` (a child link of `parent`, or the root link when there is
    /// no parent) at `new` instead.
    fn replace_child(&mut self, parent: Link, old: NonNull<Node>, new: NonNull<Node>) {
        match parent.0 {
            None => self.root = Link(Some(new)),
            // SAFETY: `parent` is a live node owned by this tree and no reference to it is held.
            Some(parent) => unsafe {
                let parent = parent.as_ptr();
                if (*parent).left.0 == Some(old) {
                    (*parent).left = Link(Some(new));
                } else {
                    (*parent).right = Link(Some(new));
                }
            },
        }
    }
}

/// Which child of its parent a node is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Which side of its parent `node` hangs off. `None` for the root, or for a node whose parent
/// doesn't point back at it.
fn side(node: NonNull<Node>) -> Option<Side> {
    // SAFETY: `node` and its parent are live nodes of the same tree and are only read here.
    let parent = unsafe { node.as_ref() }.parent.node()?;
    if parent.left.0 == Some(node) {
        Some(Side::Left)
    } else if parent.right.0 == Some(node) {
        Some(Side::Right)
    } else {
        None
    }
}

/// The sibling of `node`'s parent. Empty when `node` has no grandparent.
fn uncle(node: NonNull<Node>) -> Link {
    // SAFETY: `node` and its ancestors are live nodes of the same tree and are only read here.
    let Some(parent) = unsafe { node.as_ref() }.parent.0 else {
        return Link(None);
    };
    let Some(grandparent) = unsafe { parent.as_ref() }.parent.node() else {
        return Link(None);
    };
    if grandparent.left.0 == Some(parent) {
        grandparent.right
    } else {
        grandparent.left
    }
}

/// # Safety
///
/// `node` must be a live node with no outstanding references to it.
unsafe fn set_color(node: NonNull<Node>, color: Color) {
    (*node.as_ptr()).color = color;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("R"),
            Self::Black => f.write_str("B"),
        }
    }
}

/// A nullable pointer to a `Node`. Whether it owns the node depends on where it's stored: a
/// node's `left`/`right` and the tree's `root` own, a node's `parent` doesn't.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Link(Option<NonNull<Node>>);

impl Link {
    fn from_box(node: Box<Node>) -> Self {
        Self(Some(NonNull::from(Box::leak(node))))
    }

    fn node(&self) -> Option<&Node> {
        // SAFETY: If the node is not `None` then it is a valid `Node`. Because we take `&self`
        // here, there can be no aliasing with `self.node_mut()`. There can only be aliasing with
        // `self.0.unwrap().as_mut()`. This code would be unsafe so it'd be the caller's
        // responsibility to ensure there is no existing borrow of the inner pointer.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    fn node_mut(&mut self) -> Option<&mut Node> {
        // SAFETY: See `Link::node`.
        unsafe { self.0.as_mut().map(|ptr| ptr.as_mut()) }
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    /// Missing nodes count as black.
    fn color(&self) -> Color {
        self.node().map_or(Color::Black, |n| n.color)
    }
}

struct Node {
    key: i32,
    color: Color,
    left: Link,
    right: Link,
    parent: Link,
}

impl Drop for Node {
    fn drop(&mut self) {
        // SAFETY: Dropping a node doesn't drop its parent and we are the only owners of these
        // children so we won't drop them twice. They were initially allocated using `Box::new` (in
        // `Node::new_boxed`) so they should be well aligned, etc.
        unsafe {
            if let Some(left) = self.left.0.take() {
                drop(Box::from_raw(left.as_ptr()));
            }
            if let Some(right) = self.right.0.take() {
                drop(Box::from_raw(right.as_ptr()));
            }
        }
    }
}

impl Clone for Node {
    /// Deep copies the subtree. The copy has no parent; whoever places it on the heap has to point
    /// its children's parent links at it (see [`Node::leak_clone`]).
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            color: self.color,
            left: Link(self.left().map(Node::leak_clone)),
            right: Link(self.right().map(Node::leak_clone)),
            parent: Link(None),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("color", &self.color)
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color, self.key)
    }
}

impl Node {
    fn new_boxed(key: i32, color: Color) -> Box<Self> {
        Box::new(Node {
            key,
            color,
            left: Link(None),
            right: Link(None),
            parent: Link(None),
        })
    }

    /// Deep copies this subtree onto the heap and points the copied children back at the new
    /// allocation.
    fn leak_clone(&self) -> NonNull<Self> {
        let copy = NonNull::from(Box::leak(Box::new(self.clone())));
        // SAFETY: `copy` and its children were all just allocated by this call so nothing else
        // references them. Only raw place writes are used so `copy` stays valid for the parent
        // links handed out here.
        unsafe {
            for child in [(*copy.as_ptr()).left.0, (*copy.as_ptr()).right.0]
                .into_iter()
                .flatten()
            {
                (*child.as_ptr()).parent = Link(Some(copy));
            }
        }
        copy
    }

    fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    fn right(&self) -> Option<&Self> {
        self.right.node()
    }
}

#[derive(Clone, Copy)]
enum Order {
    Infix,
    Prefix,
    Postfix,
}

/// Writes a subtree node by node in the given order.
struct Traversal<'a> {
    root: Option<&'a Node>,
    order: Order,
}

impl fmt::Display for Traversal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, self.root)
    }
}

impl Traversal<'_> {
    fn write(&self, f: &mut fmt::Formatter<'_>, node: Option<&Node>) -> fmt::Result {
        let Some(node) = node else {
            return Ok(());
        };

        match self.order {
            Order::Infix => {
                self.write(f, node.left())?;
                write!(f, " {node} ")?;
                self.write(f, node.right())
            }
            Order::Prefix => {
                write!(f, " {node} ")?;
                self.write(f, node.left())?;
                self.write(f, node.right())
            }
            Order::Postfix => {
                self.write(f, node.left())?;
                self.write(f, node.right())?;
                write!(f, " {node} ")
            }
        }
    }
}

/// An iterator over the keys of a [`Tree`] in ascending order. Created by [`Tree::iter`].
pub struct Iter<'a> {
    // Nodes whose key hasn't been yielded yet, but whose left subtree has been pushed.
    stack: Vec<&'a Node>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
impl Tree {
    /// Asserts every Red-Black and BST invariant, plus that parent pointers agree with child
    /// pointers and that `len` counts the nodes.
    fn assert_valid(&self) {
        match self.root() {
            None => assert_eq!(self.len, 0),
            Some(root) => {
                assert_eq!(root.color, Color::Black, "root {} is red", root.key);
                assert!(root.parent.0.is_none());
                let (_, count) = check_subtree(root, None, None);
                assert_eq!(count, self.len);
            }
        }
    }

    fn height(&self) -> usize {
        fn height(node: Option<&Node>) -> usize {
            node.map_or(0, |n| 1 + height(n.left()).max(height(n.right())))
        }
        height(self.root())
    }
}

/// Returns the black-height and the number of nodes of the subtree under `node`, asserting along
/// the way.
#[cfg(test)]
fn check_subtree(node: &Node, lower: Option<i32>, upper: Option<i32>) -> (usize, usize) {
    if let Some(lower) = lower {
        assert!(node.key > lower, "{} is left of {lower}", node.key);
    }
    if let Some(upper) = upper {
        assert!(node.key < upper, "{} is right of {upper}", node.key);
    }

    fn check_child(
        parent: &Node,
        child: Option<&Node>,
        lower: Option<i32>,
        upper: Option<i32>,
    ) -> (usize, usize) {
        let Some(child) = child else {
            return (0, 0);
        };
        assert_eq!(child.parent.0, Some(NonNull::from(parent)));
        if parent.color == Color::Red {
            assert_eq!(
                child.color,
                Color::Black,
                "red {} has red child {}",
                parent.key,
                child.key
            );
        }
        check_subtree(child, lower, upper)
    }

    let (left_height, left_count) = check_child(node, node.left(), lower, Some(node.key));
    let (right_height, right_count) = check_child(node, node.right(), Some(node.key), upper);
    assert_eq!(
        left_height, right_height,
        "black-heights differ under {}",
        node.key
    );

    let own = usize::from(node.color == Color::Black);
    (left_height + own, left_count + right_count + 1)
}


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and a set.
    /// This way we can ensure that after a random smattering of inserts
    /// the tree agrees with the set and stays balanced the whole time.
    fn do_ops(ops: &[Op<i8>], tree: &mut Tree, set: &mut BTreeSet<i32>) {
        for op in ops {
            match *op {
                Op::Insert(k) => {
                    let k = i32::from(k);
                    let expected = if set.insert(k) {
                        Ok(())
                    } else {
                        Err(Error::DuplicateKey(k))
                    };
                    assert_eq!(tree.insert(k), expected);
                    tree.assert_valid();
                }
                Op::Contains(k) => {
                    let k = i32::from(k);
                    assert_eq!(tree.contains(k), set.contains(&k));
                }
                Op::Bounds => {
                    assert_eq!(tree.min().ok(), set.first().copied());
                    assert_eq!(tree.max().ok(), set.last().copied());
                }
                Op::Iter => assert!(tree.iter().eq(set.iter().copied())),
            }
        }
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
            let mut tree = Tree::new();
            let mut set = BTreeSet::new();

            do_ops(&ops, &mut tree, &mut set);
            tree.assert_valid();

            tree.len() == set.len() && set.iter().all(|k| tree.contains(*k))
        }
    }

    quickcheck::quickcheck! {
        fn sorted_inserts_stay_shallow(n: u16) -> bool {
            let n = i32::from(n % 512);
            let mut tree = Tree::new();
            for x in 0..n {
                tree.insert(x).unwrap();
            }
            tree.assert_valid();

            // A red-black tree with `n` nodes is at most `2 * lg(n + 1)` tall.
            (tree.height() as f64) <= 2.0 * f64::from(n + 1).log2()
        }
    }

    quickcheck::quickcheck! {
        fn clone_matches(xs: Vec<i16>) -> bool {
            let mut tree = Tree::new();
            for x in xs {
                let _ = tree.insert(i32::from(x));
            }
            let copy = tree.clone();
            copy.assert_valid();

            copy.to_prefix_string() == tree.to_prefix_string() && copy.len() == tree.len()
        }
    }
}
