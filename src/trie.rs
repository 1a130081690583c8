use std::{collections::BTreeMap, fmt};

use tracing::{debug, trace};

use crate::error::{Operation, TrieError};

/// A node in the trie
struct Node {
    // The character on the edge pointing at this node
    letter: char,
    // Whether a stored word ends at this node
    terminal: bool,
    // The children of this node, keyed by the character
    children: BTreeMap<char, Node>,
}

impl Node {
    fn new(letter: char) -> Self {
        Node {
            letter,
            terminal: false,
            children: BTreeMap::new(),
        }
    }
}

/// An in-memory prefix tree over words.
///
/// The root holds one node per distinct first character, so the structure is
/// a forest of character paths. Nodes are only ever created by [`Trie::add`]
/// and live as long as the trie does.
///
/// Every operation rejects the empty string with [`TrieError::EmptyInput`].
/// A missing path is not an error: [`Trie::contains`] answers `false` and
/// [`Trie::get`] answers an empty list.
#[derive(Default)]
pub struct Trie {
    root: BTreeMap<char, Node>,
    len: usize,
}

impl Trie {
    /// Creates a new, empty trie
    pub fn new() -> Self {
        Trie::default()
    }

    /// Number of distinct words stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a word, creating any nodes missing along its path and marking
    /// the last one as the end of a word. Adding a word twice is a no-op.
    pub fn add(&mut self, word: &str) -> Result<(), TrieError> {
        let mut chars = word.chars();
        let first = chars.next().ok_or_else(|| reject(Operation::Add))?;

        let mut current_node = self.root.entry(first).or_insert_with(|| {
            trace!("Creating root node for {:?}", first);
            Node::new(first)
        });
        for (depth, c) in chars.enumerate() {
            current_node = current_node.children.entry(c).or_insert_with(|| {
                trace!("Creating node for {:?} at depth {}", c, depth + 1);
                Node::new(c)
            });
        }

        let is_new = !current_node.terminal;
        current_node.terminal = true;
        if is_new {
            self.len += 1;
        }
        Ok(())
    }

    /// Adds every word yielded by `words` and returns how many of them were
    /// not already stored. Stops at the first empty word; the words before
    /// it stay in the trie.
    pub fn extend_words<I, S>(&mut self, words: I) -> Result<usize, TrieError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.len;
        for word in words {
            self.add(word.as_ref())?;
        }
        Ok(self.len - before)
    }

    /// Checks whether `word` was stored as a complete word. A word that only
    /// exists as the prefix of a longer one is not contained.
    pub fn contains(&self, word: &str) -> Result<bool, TrieError> {
        if word.is_empty() {
            return Err(reject(Operation::Contains));
        }
        Ok(self.walk(word).is_some_and(|(node, _)| node.terminal))
    }

    /// Returns every stored word starting with `prefix`, in lexicographic
    /// order of characters.
    pub fn get(&self, prefix: &str) -> Result<Vec<String>, TrieError> {
        if prefix.is_empty() {
            return Err(reject(Operation::Get));
        }

        let mut result = Vec::new();
        if let Some((node, current_word)) = self.walk(prefix) {
            Self::collect(node, current_word, &mut result);
        }
        Ok(result)
    }

    /// Follows `word` down from the root. Returns the last node on the path
    /// along with the path rebuilt from the stored letters, or `None` as soon
    /// as a character is missing.
    fn walk(&self, word: &str) -> Option<(&Node, String)> {
        let mut chars = word.chars();
        let mut current_node = self.root.get(&chars.next()?)?;
        let mut current_word = String::from(current_node.letter);

        for c in chars {
            current_node = current_node.children.get(&c)?;
            current_word.push(current_node.letter);
        }
        Some((current_node, current_word))
    }

    /// Depth-first search collecting every word at or below `node`, where
    /// `current_word` spells the path down to `node`. Each stack entry holds
    /// a node and the length of the buffer before its letter was pushed.
    fn collect(node: &Node, mut current_word: String, result: &mut Vec<String>) {
        if node.terminal {
            result.push(current_word.clone());
        }

        let mut stack: Vec<(&Node, usize)> = node
            .children
            .values()
            .rev()
            .map(|child| (child, current_word.len()))
            .collect();
        while let Some((node, depth)) = stack.pop() {
            current_word.truncate(depth);
            current_word.push(node.letter);
            if node.terminal {
                result.push(current_word.clone());
            }

            let depth = current_word.len();
            stack.extend(node.children.values().rev().map(|child| (child, depth)));
        }
    }
}

impl fmt::Debug for Trie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trie")
            .field("len", &self.len)
            .field("first_letters", &self.root.keys().collect::<Vec<_>>())
            .finish()
    }
}

// Nodes are unlinked one at a time so dropping a long path does not recurse.
impl Drop for Trie {
    fn drop(&mut self) {
        let mut stack: Vec<Node> = std::mem::take(&mut self.root).into_values().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(std::mem::take(&mut node.children).into_values());
        }
    }
}

fn reject(op: Operation) -> TrieError {
    debug!("Rejecting empty input to {}", op);
    TrieError::EmptyInput(op)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn trie_of(words: &[&str]) -> Trie {
        let mut trie = Trie::new();
        for word in words {
            trie.add(word).unwrap();
        }
        trie
    }

    // Walks every node and checks that no leaf is left non-terminal.
    fn assert_leaves_terminal(nodes: &BTreeMap<char, Node>) {
        for (c, node) in nodes {
            assert_eq!(*c, node.letter);
            if node.children.is_empty() {
                assert!(node.terminal, "leaf {:?} is not terminal", c);
            }
            assert_leaves_terminal(&node.children);
        }
    }

    #[test]
    fn test_added_words_are_contained() {
        let words = ["apple", "app", "banana", "band", "b"];
        let trie = trie_of(&words);

        for word in words {
            assert!(trie.contains(word).unwrap(), "{} should be contained", word);
        }
        for word in ["ap", "appl", "apples", "ban", "bandana", "c"] {
            assert!(!trie.contains(word).unwrap(), "{} should not be contained", word);
        }
        assert_eq!(trie.len(), words.len());
    }

    #[test]
    fn test_prefix_is_not_a_word() {
        let trie = trie_of(&["car"]);

        assert_eq!(trie.contains("car"), Ok(true));
        assert_eq!(trie.contains("ca"), Ok(false));
        assert_eq!(trie.contains("cart"), Ok(false));
    }

    #[test]
    fn test_add_is_idempotent() {
        let once = trie_of(&["car", "cart"]);
        let twice = trie_of(&["car", "cart", "car", "cart"]);

        assert_eq!(once.len(), twice.len());
        for query in ["c", "ca", "car", "cart", "carts"] {
            assert_eq!(once.contains(query), twice.contains(query));
            assert_eq!(once.get(query), twice.get(query));
        }
    }

    #[test]
    fn test_get_returns_completions_of_prefix() {
        let trie = trie_of(&["car", "cart", "cartier", "carter", "c", "cgombo"]);

        let found: HashSet<String> = trie.get("cart").unwrap().into_iter().collect();
        let expected: HashSet<String> = ["cart", "cartier", "carter"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_get_is_sorted() {
        let trie = trie_of(&["cgombo", "cartier", "c", "carter", "car", "cart"]);

        assert_eq!(
            trie.get("c").unwrap(),
            vec!["c", "car", "cart", "carter", "cartier", "cgombo"]
        );
    }

    #[test]
    fn test_get_unknown_prefix() {
        let trie = trie_of(&["car", "cart"]);

        assert!(trie.get("xyz").unwrap().is_empty());
        assert!(trie.get("carts").unwrap().is_empty());
        assert!(trie.get("Car").unwrap().is_empty());
    }

    #[test]
    fn test_empty_trie() {
        let trie = Trie::new();

        assert!(trie.is_empty());
        assert_eq!(trie.contains("anything"), Ok(false));
        assert_eq!(trie.get("anything"), Ok(vec![]));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut trie = trie_of(&["car"]);

        assert_eq!(trie.add(""), Err(TrieError::EmptyInput(Operation::Add)));
        assert_eq!(
            trie.contains(""),
            Err(TrieError::EmptyInput(Operation::Contains))
        );
        assert_eq!(trie.get(""), Err(TrieError::EmptyInput(Operation::Get)));

        // Nothing was stored by the rejected add.
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.get("c").unwrap(), vec!["car"]);
    }

    #[test]
    fn test_multibyte_characters() {
        let trie = trie_of(&["héllo", "hélium", "日本", "日本語"]);

        assert_eq!(trie.contains("héllo"), Ok(true));
        assert_eq!(trie.contains("hello"), Ok(false));
        assert_eq!(trie.get("hé").unwrap(), vec!["hélium", "héllo"]);
        assert_eq!(trie.get("日").unwrap(), vec!["日本", "日本語"]);
    }

    #[test]
    fn test_leaves_are_terminal() {
        let trie = trie_of(&["car", "cart", "cartier", "carter", "c", "cgombo", "dog"]);
        assert_leaves_terminal(&trie.root);
    }

    #[test]
    fn test_extend_words() {
        let mut trie = trie_of(&["car"]);

        let added = trie.extend_words(["car", "cart", "cat"]).unwrap();
        assert_eq!(added, 2);
        assert_eq!(trie.len(), 3);

        let err = trie.extend_words(vec!["dog".to_string(), String::new(), "emu".to_string()]);
        assert_eq!(err, Err(TrieError::EmptyInput(Operation::Add)));
        assert_eq!(trie.contains("dog"), Ok(true));
        assert_eq!(trie.contains("emu"), Ok(false));
    }

    #[test]
    fn test_long_word() {
        let word = "a".repeat(100_000);
        let mut trie = Trie::new();
        trie.add(&word).unwrap();
        trie.add("ab").unwrap();

        assert_eq!(trie.contains(&word), Ok(true));
        assert_eq!(trie.contains(&word[..99_999]), Ok(false));
        assert_eq!(trie.get(&word[..50_000]).unwrap(), vec![word.clone()]);

        let found = trie.get("a").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], word);
        assert_eq!(found[1], "ab");

        drop(trie);
    }

    #[test]
    fn test_debug_summary() {
        let trie = trie_of(&["car", "bus", "cart"]);

        assert_eq!(
            format!("{:?}", trie),
            "Trie { len: 3, first_letters: ['b', 'c'] }"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            TrieError::EmptyInput(Operation::Contains).to_string(),
            "`contains` was called with an empty word"
        );
    }
}
