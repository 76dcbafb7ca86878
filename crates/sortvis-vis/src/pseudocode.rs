//! Pseudo-code and complexity notes shown beside the animation.

use serde::Serialize;
use sortvis_kernels::AlgorithmKind;

/// Time and space complexity of an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Complexity {
    pub time: &'static str,
    pub space: &'static str,
}

/// Everything the documentation panel shows for one algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmDoc {
    pub id: &'static str,
    pub name: &'static str,
    pub lines: &'static [&'static str],
    pub complexity: Complexity,
}

impl AlgorithmDoc {
    pub fn of(kind: AlgorithmKind) -> Self {
        Self {
            id: kind.id(),
            name: kind.name(),
            lines: pseudo_code(kind),
            complexity: complexity(kind),
        }
    }
}

const BUBBLE: &[&str] = &[
    "for i = 0 to n-2",
    "  for j = 0 to n-i-2",
    "    if array[j] > array[j+1]",
    "      swap(array[j], array[j+1])",
    "    end if",
    "  end for",
    "end for",
];

const SELECTION: &[&str] = &[
    "for i = 0 to n-2",
    "  minIndex = i",
    "  for j = i+1 to n-1",
    "    if array[j] < array[minIndex]",
    "      minIndex = j",
    "    end if",
    "  end for",
    "  if minIndex != i",
    "    swap(array[i], array[minIndex])",
    "  end if",
    "end for",
];

const INSERTION: &[&str] = &[
    "for i = 1 to n-1",
    "  key = array[i]",
    "  j = i-1",
    "  while j >= 0 and array[j] > key",
    "    array[j+1] = array[j]",
    "    j = j-1",
    "  end while",
    "  array[j+1] = key",
    "end for",
];

const MERGE: &[&str] = &[
    "function mergeSort(array, left, right)",
    "  if left < right",
    "    mid = (left + right) / 2",
    "    mergeSort(array, left, mid)",
    "    mergeSort(array, mid+1, right)",
    "    merge(array, left, mid, right)",
    "  end if",
    "end function",
    "",
    "function merge(array, left, mid, right)",
    "  // Merge two sorted subarrays",
    "  // into a single sorted array",
];

const QUICK: &[&str] = &[
    "function quickSort(array, low, high)",
    "  if low < high",
    "    pi = partition(array, low, high)",
    "    quickSort(array, low, pi-1)",
    "    quickSort(array, pi+1, high)",
    "  end if",
    "end function",
    "",
    "function partition(array, low, high)",
    "  pivot = array[high]",
    "  i = low - 1",
    "  for j = low to high-1",
    "    if array[j] < pivot",
    "      i = i + 1",
    "      swap(array[i], array[j])",
    "    end if",
    "  end for",
    "  swap(array[i+1], array[high])",
    "  return i + 1",
];

/// Pseudo-code lines for `kind`.
pub fn pseudo_code(kind: AlgorithmKind) -> &'static [&'static str] {
    match kind {
        AlgorithmKind::Bubble => BUBBLE,
        AlgorithmKind::Selection => SELECTION,
        AlgorithmKind::Insertion => INSERTION,
        AlgorithmKind::Merge => MERGE,
        AlgorithmKind::Quick => QUICK,
    }
}

pub fn complexity(kind: AlgorithmKind) -> Complexity {
    match kind {
        AlgorithmKind::Bubble | AlgorithmKind::Selection | AlgorithmKind::Insertion => Complexity {
            time: "O(n²)",
            space: "O(1)",
        },
        AlgorithmKind::Merge => Complexity {
            time: "O(n log n)",
            space: "O(n)",
        },
        AlgorithmKind::Quick => Complexity {
            time: "O(n log n) average, O(n²) worst case",
            space: "O(log n)",
        },
    }
}

/// Plain-text rendering for copying: heading, pseudo-code, complexity.
pub fn clipboard_text(kind: AlgorithmKind) -> String {
    let Complexity { time, space } = complexity(kind);
    let mut text = format!("{} Algorithm:\n", kind.name());
    for line in pseudo_code(kind) {
        text.push_str(line);
        text.push('\n');
    }
    text.push('\n');
    text.push_str(&format!("Time Complexity: {time}\nSpace Complexity: {space}"));
    text
}
