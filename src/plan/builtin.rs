//! The built-in 35-day DSA plan

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::model::{Day, PlanCatalog};

/// Name of the built-in plan
pub const DSA_35_NAME: &str = "DSA 35-Day Challenge";

/// (day, topic, problems, week, hours)
const DSA_35_DAYS: &[(u32, &str, u32, u32, u32)] = &[
    (1, "Time & Space Complexity + Basics of Arrays", 13, 1, 8),
    (2, "Arrays Easy Level (Traversal, Basic Manipulations)", 13, 1, 8),
    (3, "Arrays Medium Level (Kadane's, Majority, etc.)", 13, 1, 8),
    (4, "2D Arrays + Prefix Sum + Advanced Manipulations", 13, 1, 8),
    (5, "Sorting Algorithms (Selection, Bubble, Insertion, Merge)", 13, 1, 8),
    (6, "Binary Search Basics + Variants on 1D Arrays", 13, 1, 8),
    (7, "Binary Search on Answer + Practice & Revision", 13, 1, 8),
    (8, "Recursion Basics (Print, Backtrack, Factorial, Fibonacci)", 13, 2, 8),
    (9, "Advanced Recursion + Backtracking (N-Queens, Subsets)", 13, 2, 8),
    (10, "Singly Linked List Basics (Insertion, Deletion, Traverse)", 13, 2, 8),
    (11, "Advanced Linked List (Reverse, Cycle Detection, Merge)", 13, 2, 8),
    (12, "Stack & Queue Basics + Implementations (Infix, Prefix)", 13, 2, 8),
    (13, "Monotonic Stack + Sliding Window Maximum/Minimum", 13, 2, 8),
    (14, "Linked List & Recursion Revision + Practice", 13, 2, 8),
    (15, "Trees Basics (DFS, BFS, Height, Diameter)", 13, 3, 8),
    (16, "Binary Tree Traversals + Advanced (LCA, Path Sum)", 13, 3, 8),
    (17, "Binary Search Tree (BST) - Operations & Properties", 13, 3, 8),
    (18, "Heaps (Min/Max), Heap Sort, K-Largest Elements", 13, 3, 8),
    (19, "Tries Basics (Insert/Search Words, Prefix Problems)", 13, 3, 8),
    (20, "Hashing Techniques (Map, Set, Count, Frequency)", 13, 3, 8),
    (21, "Tree, BST & Hashing Revision + Practice", 13, 3, 8),
    (22, "Graphs Basics (BFS, DFS, Adjacency List/Matrix)", 13, 4, 8),
    (23, "Topological Sort + Union Find + Cycle Detection", 13, 4, 8),
    (24, "Dijkstra, Prim's, Kruskal's (MST + Shortest Paths)", 13, 4, 8),
    (25, "Greedy Algorithms (Activity Selection, Job Sequencing)", 13, 4, 8),
    (26, "Dynamic Programming Basics (0/1 Knapsack, Fibonacci)", 13, 4, 8),
    (27, "DP Medium (LIS, Subset Sum, Partition Equal Subset)", 13, 4, 8),
    (28, "DP Hard (Palindromic Substrings, MCM, DP on Trees)", 13, 4, 8),
    (29, "Bit Manipulation + Mathematics (GCD, Primes, XOR)", 13, 5, 8),
    (30, "Sliding Window + Two Pointer Advanced (Min Substring, K Distinct)", 13, 5, 8),
    (31, "String Algorithms (Z-Algorithm, KMP, Rabin Karp)", 13, 5, 8),
    (32, "Advanced Arrays (Spiral, Next Permutation, Trapping Rain)", 13, 5, 8),
    (33, "Advanced Trees (Serialization, Views, Boundary, Zigzag)", 13, 5, 8),
    (34, "Hard Graph Problems (Bridges, Articulation Points, DP on Graphs)", 13, 5, 8),
    (35, "Final Practice, Full Mock DSA Set + Weak Areas", 13, 5, 8),
];

const DSA_35_WEEK_TITLES: &[(u32, &str)] = &[
    (1, "Foundation - Arrays, Sorting & Binary Search"),
    (2, "Recursion, Backtracking, Linked Lists, Stack & Queues"),
    (3, "Trees, BST, Heaps, Tries, Hashing"),
    (4, "Graphs, DP, and Greedy Algorithms"),
    (5, "Advanced Topics, Bit Magic, and Final Practice"),
];

static DSA_35: Lazy<PlanCatalog> = Lazy::new(|| {
    let days = DSA_35_DAYS
        .iter()
        .map(|&(day, topic, problems, week, hours)| Day::new(day, topic, problems, week, hours))
        .collect();
    let titles: BTreeMap<u32, String> =
        DSA_35_WEEK_TITLES.iter().map(|&(week, title)| (week, title.to_string())).collect();
    PlanCatalog::assemble(DSA_35_NAME.to_string(), days, titles)
});

/// The built-in 35-day plan: 13 problems and 8 hours a day across five weeks
pub fn dsa_35() -> &'static PlanCatalog {
    &DSA_35
}
